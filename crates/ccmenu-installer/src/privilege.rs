use anyhow::Result;
use std::process::Command;

use crate::command::{run_command_output, CommandOutput};

pub trait PrivilegeCheck {
    fn is_elevated(&self) -> bool;
}

/// `net session` only succeeds from an elevated token.
pub struct NetSessionPrivilege<RunCommand> {
    run_command: RunCommand,
}

impl NetSessionPrivilege<fn(&mut Command, &str) -> Result<CommandOutput>> {
    pub fn system() -> Self {
        Self::with_executor(run_command_output)
    }
}

impl<RunCommand> NetSessionPrivilege<RunCommand>
where
    RunCommand: Fn(&mut Command, &str) -> Result<CommandOutput>,
{
    pub fn with_executor(run_command: RunCommand) -> Self {
        Self { run_command }
    }
}

impl<RunCommand> PrivilegeCheck for NetSessionPrivilege<RunCommand>
where
    RunCommand: Fn(&mut Command, &str) -> Result<CommandOutput>,
{
    fn is_elevated(&self) -> bool {
        if !cfg!(windows) {
            return false;
        }
        let mut command = Command::new("net");
        command.arg("session");
        (self.run_command)(&mut command, "failed to check administrator privileges")
            .map(|output| output.success)
            .unwrap_or(false)
    }
}
