use std::process::ExitCode;

use anyhow::Result;
use ccmenu_core::{plan, Component, Config, TargetState};
use ccmenu_installer::{
    action_journal_path, apply_with_observer, launch_assistant, resolve_state_dir, snapshot,
    ActionJournal, Host, NetSessionPrivilege, RegExeRegistry, WslToolchain,
};

use crate::completion::write_completions_script;
use crate::render::{
    current_output_style, render_plan_lines, render_report_lines, render_snapshot_lines,
    render_step_line, TerminalRenderer,
};
use crate::Cli;

pub(crate) fn run_cli(cli: Cli) -> Result<ExitCode> {
    if let Some(shell) = cli.completions {
        write_completions_script(shell, &mut std::io::stdout().lock())?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::load(cli.config.as_deref())?;

    if let Some(directory) = cli.launch.as_deref() {
        let code = launch_assistant(&config, directory)?;
        return Ok(exit_code_from_status(code));
    }

    let renderer = TerminalRenderer::from_style(current_output_style(cli.plain));
    let registry = RegExeRegistry::system(&config);
    let tools = WslToolchain::system(&config);
    let privilege = NetSessionPrivilege::system();
    let host = Host::new(&config, &registry, &tools, &tools, &privilege);

    let succeeded = run_reconcile(&host, cli.target(), cli.dry_run, renderer)?;
    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub(crate) fn exit_code_from_status(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(code) => ExitCode::from(code),
        Err(_) => ExitCode::FAILURE,
    }
}

/// Probe, plan and apply once. Returns whether every planned step took effect.
pub(crate) fn run_reconcile(
    host: &Host<'_>,
    target: TargetState,
    dry_run: bool,
    renderer: TerminalRenderer,
) -> Result<bool> {
    let style = renderer.style();
    let before = snapshot(host);

    renderer.print_section("Status");
    renderer.print_lines(&render_snapshot_lines(style, &before));
    if before.state(Component::Runtime).is_absent() {
        renderer.print_status(
            "warn",
            "command runtime did not respond; installer steps may fail",
        );
    }
    if target == TargetState::StatusOnly {
        return Ok(true);
    }

    let plan = plan(&before, target);
    renderer.print_section("Plan");
    renderer.print_lines(&render_plan_lines(style, &plan));
    if plan.is_empty() {
        return Ok(true);
    }
    if dry_run {
        renderer.print_status("info", "dry run: no changes applied");
        return Ok(true);
    }

    let mut journal = open_action_journal(host.config, target, renderer);
    renderer.print_section("Apply");
    let mut progress = renderer.start_progress(target.as_str(), plan.len() as u64);
    let result = apply_with_observer(&plan, host, &mut journal, |step| {
        progress.set(step.index as u64 + 1);
        progress.println(&render_step_line(style, plan.len(), step));
    });
    let report = match result {
        Ok(report) => report,
        Err(err) => {
            progress.finish_abandon();
            return Err(err.into());
        }
    };
    if report.aborted() {
        progress.finish_abandon();
    } else {
        progress.finish_success();
    }

    renderer.print_lines(&render_report_lines(style, &report));
    if let Some(path) = journal.path() {
        renderer.print_status("info", &format!("action journal: {}", path.display()));
    }

    renderer.print_section("Result");
    renderer.print_lines(&render_snapshot_lines(style, &snapshot(host)));
    Ok(report.is_success())
}

fn open_action_journal(
    config: &Config,
    target: TargetState,
    renderer: TerminalRenderer,
) -> ActionJournal {
    let opened = resolve_state_dir(config)
        .and_then(|dir| ActionJournal::open(action_journal_path(&dir), target));
    match opened {
        Ok(journal) => journal,
        Err(err) => {
            renderer.print_status(
                "warn",
                &format!("action journal disabled for this run: {err:#}"),
            );
            ActionJournal::in_memory(target)
        }
    }
}
