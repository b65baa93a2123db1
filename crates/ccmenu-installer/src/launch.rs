use anyhow::{Context, Result};
use ccmenu_core::{translate_windows_path, Config};
use std::process::Command;

/// `wsl -d <distro> --cd <linux path> bash -lic <assistant>` for a Windows folder.
pub fn build_launch_command(config: &Config, directory: &str) -> Result<Command> {
    let linux_path = translate_windows_path(directory)
        .with_context(|| format!("cannot open '{directory}' inside {}", config.distro))?;

    let mut command = Command::new("wsl");
    command
        .arg("-d")
        .arg(&config.distro)
        .arg("--cd")
        .arg(linux_path)
        .arg("bash")
        .arg("-lic")
        .arg(&config.assistant_command);
    Ok(command)
}

/// Runs the assistant attached to the current console and returns its exit code.
pub fn launch_assistant(config: &Config, directory: &str) -> Result<i32> {
    let mut command = build_launch_command(config, directory)?;
    let status = command
        .status()
        .with_context(|| format!("failed to start {} in {}", config.assistant_command, config.distro))?;
    Ok(status.code().unwrap_or(1))
}
