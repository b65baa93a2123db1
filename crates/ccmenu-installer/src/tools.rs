use anyhow::{anyhow, Result};
use ccmenu_core::{normalize_tool_version, Component, Config, ExternalComponent};
use std::process::Command;
use thiserror::Error;

use crate::command::{describe_command, run_command_output, CommandOutput};

/// Answers "is this tool present, and which version".
pub trait VersionQuery {
    /// `Err` means the tool is missing or its query did not exit successfully.
    fn query_version(&self, component: Component) -> Result<Option<String>>;
}

pub trait ExternalInstaller {
    fn install(&self, component: ExternalComponent) -> Result<Option<String>, InstallError>;
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InstallError {
    #[error("{component} installer could not run `{command}`: {detail}")]
    Spawn {
        component: ExternalComponent,
        command: String,
        detail: String,
    },
    #[error("{component} installer step `{command}` failed: {detail}")]
    StepFailed {
        component: ExternalComponent,
        command: String,
        detail: String,
    },
}

impl InstallError {
    pub fn component(&self) -> ExternalComponent {
        match self {
            Self::Spawn { component, .. } | Self::StepFailed { component, .. } => *component,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistroEntry {
    pub name: String,
    pub state: String,
    pub wsl_version: String,
    pub is_default: bool,
}

/// Parses the table printed by `wsl -l -v`.
pub fn parse_distro_listing(listing: &str) -> Vec<DistroEntry> {
    let mut entries = Vec::new();
    for line in listing.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let (is_default, row) = match line.strip_prefix('*') {
            Some(rest) => (true, rest.trim_start()),
            None => (false, line),
        };
        let columns = row.split_whitespace().collect::<Vec<_>>();
        if columns.len() != 3 || columns[0].eq_ignore_ascii_case("NAME") {
            continue;
        }
        entries.push(DistroEntry {
            name: columns[0].to_string(),
            state: columns[1].to_string(),
            wsl_version: columns[2].to_string(),
            is_default,
        });
    }
    entries
}

/// Drives `wsl.exe`, `apt-get` and `npm` for the external components.
pub struct WslToolchain<RunCommand> {
    distro: String,
    assistant_command: String,
    assistant_package: String,
    node_setup_url: String,
    run_command: RunCommand,
}

impl WslToolchain<fn(&mut Command, &str) -> Result<CommandOutput>> {
    pub fn system(config: &Config) -> Self {
        Self::with_executor(config, run_command_output)
    }
}

impl<RunCommand> WslToolchain<RunCommand>
where
    RunCommand: Fn(&mut Command, &str) -> Result<CommandOutput>,
{
    pub fn with_executor(config: &Config, run_command: RunCommand) -> Self {
        Self {
            distro: config.distro.clone(),
            assistant_command: config.assistant_command.clone(),
            assistant_package: config.assistant_package.clone(),
            node_setup_url: config.node_setup_url.clone(),
            run_command,
        }
    }

    fn wsl(&self, args: &[&str]) -> Command {
        let mut command = Command::new("wsl");
        command.args(args);
        command
    }

    fn in_distro(&self, args: &[&str]) -> Command {
        let mut command = self.wsl(&["-d", self.distro.as_str(), "--"]);
        command.args(args);
        command
    }

    fn in_distro_as_root(&self, args: &[&str]) -> Command {
        let mut command = self.wsl(&["-d", self.distro.as_str(), "-u", "root", "--"]);
        command.args(args);
        command
    }

    fn query(&self, mut command: Command, context_message: &str) -> Result<String> {
        let output = (self.run_command)(&mut command, context_message)?;
        Ok(output.into_success(context_message)?.stdout)
    }

    fn install_steps(&self, component: ExternalComponent) -> Vec<Command> {
        match component {
            ExternalComponent::Subsystem => vec![self.wsl(&["--install", "--no-launch"])],
            ExternalComponent::Distro => {
                vec![self.wsl(&["--install", "-d", self.distro.as_str(), "--no-launch"])]
            }
            ExternalComponent::JsRuntime => {
                let setup = format!("curl -fsSL {} | bash -", self.node_setup_url);
                vec![
                    self.in_distro_as_root(&["apt-get", "update", "-y"]),
                    self.in_distro_as_root(&[
                        "apt-get",
                        "install",
                        "-y",
                        "curl",
                        "wget",
                        "git",
                        "build-essential",
                    ]),
                    self.in_distro_as_root(&["bash", "-c", setup.as_str()]),
                    self.in_distro_as_root(&["apt-get", "install", "-y", "nodejs"]),
                ]
            }
            ExternalComponent::Assistant => vec![
                self.in_distro_as_root(&["npm", "config", "set", "os", "linux"]),
                self.in_distro_as_root(&[
                    "npm",
                    "install",
                    "-g",
                    self.assistant_package.as_str(),
                    "--force",
                    "--no-os-check",
                ]),
            ],
        }
    }
}

impl<RunCommand> VersionQuery for WslToolchain<RunCommand>
where
    RunCommand: Fn(&mut Command, &str) -> Result<CommandOutput>,
{
    fn query_version(&self, component: Component) -> Result<Option<String>> {
        match component {
            Component::Runtime => {
                let mut command = Command::new("cmd");
                command.args(["/c", "ver"]);
                let stdout = self.query(command, "failed to query command runtime")?;
                Ok(normalize_tool_version(&stdout))
            }
            Component::Subsystem => {
                let stdout = self.query(self.wsl(&["--version"]), "failed to query WSL")?;
                Ok(normalize_tool_version(&stdout))
            }
            Component::Distro => {
                let stdout = self.query(
                    self.wsl(&["-l", "-v"]),
                    "failed to list WSL distributions",
                )?;
                let entry = parse_distro_listing(&stdout)
                    .into_iter()
                    .find(|entry| entry.name.eq_ignore_ascii_case(&self.distro))
                    .ok_or_else(|| anyhow!("WSL distribution '{}' is not registered", self.distro))?;
                Ok(Some(format!("WSL{}", entry.wsl_version)))
            }
            Component::JsRuntime => {
                let stdout = self.query(
                    self.in_distro(&["node", "--version"]),
                    "failed to query Node.js",
                )?;
                Ok(normalize_tool_version(&stdout))
            }
            Component::Assistant => {
                let probe = format!("{} --version", self.assistant_command);
                let stdout = self.query(
                    self.in_distro(&["bash", "-lic", probe.as_str()]),
                    "failed to query assistant",
                )?;
                Ok(normalize_tool_version(&stdout))
            }
            other => Err(anyhow!("{other} is not an external tool")),
        }
    }
}

impl<RunCommand> ExternalInstaller for WslToolchain<RunCommand>
where
    RunCommand: Fn(&mut Command, &str) -> Result<CommandOutput>,
{
    fn install(&self, component: ExternalComponent) -> Result<Option<String>, InstallError> {
        for mut step in self.install_steps(component) {
            let command_line = describe_command(&step);
            let context_message = format!("failed to install {component}");
            let output = (self.run_command)(&mut step, &context_message).map_err(|err| {
                InstallError::Spawn {
                    component,
                    command: command_line.clone(),
                    detail: format!("{err:#}"),
                }
            })?;
            if !output.success {
                return Err(InstallError::StepFailed {
                    component,
                    command: command_line,
                    detail: format!(
                        "status={} stdout='{}' stderr='{}'",
                        output.status,
                        output.stdout.trim(),
                        output.stderr.trim()
                    ),
                });
            }
        }

        Ok(self.query_version(component.component()).ok().flatten())
    }
}
