use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LAUNCHER_PATH: &str = r"C:\Scripts\open_in_claude.cmd";
/// Directory created for the default launcher; uninstall may remove it.
pub const DEFAULT_LAUNCHER_DIR: &str = r"C:\Scripts";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub launcher_path: PathBuf,
    pub menu_verb: String,
    pub menu_label: String,
    pub menu_icon: String,
    pub distro: String,
    pub assistant_command: String,
    pub assistant_package: String,
    pub node_setup_url: String,
    pub state_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            launcher_path: PathBuf::from(DEFAULT_LAUNCHER_PATH),
            menu_verb: "OpenInClaude".to_string(),
            menu_label: "Open in Claude Code".to_string(),
            menu_icon: r"C:\Windows\System32\cmd.exe,0".to_string(),
            distro: "Ubuntu".to_string(),
            assistant_command: "claude".to_string(),
            assistant_package: "@anthropic-ai/claude-code".to_string(),
            node_setup_url: "https://deb.nodesource.com/setup_18.x".to_string(),
            state_dir: None,
        }
    }
}

impl Config {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input).context("failed to parse ccmenu config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("menu_verb", &self.menu_verb),
            ("menu_label", &self.menu_label),
            ("menu_icon", &self.menu_icon),
            ("distro", &self.distro),
            ("assistant_command", &self.assistant_command),
            ("assistant_package", &self.assistant_package),
            ("node_setup_url", &self.node_setup_url),
        ] {
            if value.trim().is_empty() {
                return Err(anyhow!("config field '{field}' must not be empty"));
            }
        }

        if self.menu_verb.contains(['\\', '/']) {
            return Err(anyhow!(
                "menu_verb must be a single registry key name: {}",
                self.menu_verb
            ));
        }
        if self.distro.contains(char::is_whitespace) {
            return Err(anyhow!(
                "distro name must not contain whitespace: {}",
                self.distro
            ));
        }
        if self.assistant_command.contains('"') {
            return Err(anyhow!("assistant_command must not contain double quotes"));
        }

        let launcher = self.launcher_path.display().to_string();
        if !(self.launcher_path.is_absolute() || is_windows_absolute(&launcher)) {
            return Err(anyhow!("launcher_path must be absolute: {launcher}"));
        }
        if launcher.contains('"') {
            return Err(anyhow!("launcher_path must not contain double quotes"));
        }

        Ok(())
    }
}

fn is_windows_absolute(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/')
}
