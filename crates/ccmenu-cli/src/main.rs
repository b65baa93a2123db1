use std::path::PathBuf;
use std::process::ExitCode;

use ccmenu_core::TargetState;
use clap::{ArgGroup, Parser};

mod completion;
mod dispatch;
mod render;

use completion::CliCompletionShell;

#[derive(Parser, Debug)]
#[command(name = "ccmenu")]
#[command(
    about = "Adds an \"Open in Claude Code\" entry to the Explorer folder context menu",
    long_about = None
)]
#[command(group(
    ArgGroup::new("mode")
        .args(["status", "context_only", "uninstall", "launch", "completions"])
        .multiple(false)
))]
struct Cli {
    /// Report what is installed without changing anything.
    #[arg(long)]
    status: bool,
    /// Only (re)create the launcher script and registry keys.
    #[arg(long)]
    context_only: bool,
    /// Remove the context-menu entries and the launcher script.
    #[arg(long)]
    uninstall: bool,
    /// Open the assistant in this Windows directory inside the distribution.
    #[arg(long, value_name = "DIR")]
    launch: Option<String>,
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<CliCompletionShell>,
    /// Print the planned actions without applying them.
    #[arg(long, conflicts_with_all = ["launch", "completions"])]
    dry_run: bool,
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Disable badges and progress bars.
    #[arg(long)]
    plain: bool,
}

impl Cli {
    fn target(&self) -> TargetState {
        if self.status {
            TargetState::StatusOnly
        } else if self.uninstall {
            TargetState::Uninstall
        } else if self.context_only {
            TargetState::ContextOnly
        } else {
            TargetState::FullInstall
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match dispatch::run_cli(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
