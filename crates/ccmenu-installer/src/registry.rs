use anyhow::{anyhow, Result};
use ccmenu_core::{menu_command, Config, MenuKey};
use std::process::Command;

use crate::command::{run_command_output, CommandOutput};

pub const CLASSES_ROOT: &str = "HKCR";

/// Values held by one context-menu key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuKeyEntry {
    pub label: Option<String>,
    pub icon: Option<String>,
    pub command: Option<String>,
}

pub trait RegistryStore {
    /// `Ok(None)` when the key does not exist.
    fn read_menu_key(&self, key: MenuKey) -> Result<Option<MenuKeyEntry>>;
    fn write_menu_key(&self, key: MenuKey, entry: &MenuKeyEntry) -> Result<()>;
    /// Removing a missing key succeeds.
    fn delete_menu_key(&self, key: MenuKey) -> Result<()>;
}

pub fn menu_key_path(verb: &str, key: MenuKey) -> String {
    format!(r"{CLASSES_ROOT}\{}\{verb}", key.shell_root())
}

pub fn expected_menu_entry(config: &Config, key: MenuKey) -> MenuKeyEntry {
    MenuKeyEntry {
        label: Some(config.menu_label.clone()),
        icon: Some(config.menu_icon.clone()),
        command: Some(menu_command(config, key)),
    }
}

/// Registry access through `reg.exe`.
pub struct RegExeRegistry<RunCommand> {
    verb: String,
    run_command: RunCommand,
}

impl RegExeRegistry<fn(&mut Command, &str) -> Result<CommandOutput>> {
    pub fn system(config: &Config) -> Self {
        Self::with_executor(config, run_reg_command)
    }
}

impl<RunCommand> RegExeRegistry<RunCommand>
where
    RunCommand: Fn(&mut Command, &str) -> Result<CommandOutput>,
{
    pub fn with_executor(config: &Config, run_command: RunCommand) -> Self {
        Self {
            verb: config.menu_verb.clone(),
            run_command,
        }
    }

    fn key_exists(&self, path: &str) -> Result<bool> {
        let mut command = Command::new("reg");
        command.arg("query").arg(path);
        let output = (self.run_command)(&mut command, "failed to query Windows registry key")?;
        Ok(output.success)
    }

    fn query_value(&self, path: &str, value_name: Option<&str>) -> Result<Option<String>> {
        let mut command = Command::new("reg");
        command.arg("query").arg(path);
        match value_name {
            Some(name) => command.arg("/v").arg(name),
            None => command.arg("/ve"),
        };
        let output = (self.run_command)(&mut command, "failed to query Windows registry value")?;
        if !output.success {
            return Ok(None);
        }
        Ok(parse_reg_query_value(&output.stdout))
    }

    fn add_value(&self, path: &str, value_name: Option<&str>, data: &str) -> Result<()> {
        let mut command = Command::new("reg");
        command.arg("add").arg(path);
        match value_name {
            Some(name) => command.arg("/v").arg(name),
            None => command.arg("/ve"),
        };
        command.arg("/t").arg("REG_SZ").arg("/d").arg(data).arg("/f");
        (self.run_command)(&mut command, "failed to write Windows registry value")?
            .into_success(&format!("failed to write Windows registry value under {path}"))?;
        Ok(())
    }
}

impl<RunCommand> RegistryStore for RegExeRegistry<RunCommand>
where
    RunCommand: Fn(&mut Command, &str) -> Result<CommandOutput>,
{
    fn read_menu_key(&self, key: MenuKey) -> Result<Option<MenuKeyEntry>> {
        let path = menu_key_path(&self.verb, key);
        if !self.key_exists(&path)? {
            return Ok(None);
        }

        Ok(Some(MenuKeyEntry {
            label: self.query_value(&path, None)?,
            icon: self.query_value(&path, Some("Icon"))?,
            command: self.query_value(&format!(r"{path}\command"), None)?,
        }))
    }

    // The command subkey goes last so an interrupted write reads back as partial.
    fn write_menu_key(&self, key: MenuKey, entry: &MenuKeyEntry) -> Result<()> {
        let path = menu_key_path(&self.verb, key);
        if let Some(label) = &entry.label {
            self.add_value(&path, None, label)?;
        }
        if let Some(icon) = &entry.icon {
            self.add_value(&path, Some("Icon"), icon)?;
        }
        if let Some(command) = &entry.command {
            self.add_value(&format!(r"{path}\command"), None, command)?;
        }
        Ok(())
    }

    fn delete_menu_key(&self, key: MenuKey) -> Result<()> {
        let path = menu_key_path(&self.verb, key);
        if !self.key_exists(&path)? {
            return Ok(());
        }

        let mut command = Command::new("reg");
        command.arg("delete").arg(&path).arg("/f");
        let output = (self.run_command)(&mut command, "failed to remove Windows registry key")?;
        if output.success || !self.key_exists(&path)? {
            return Ok(());
        }
        output.into_success(&format!("failed to remove Windows registry key {path}"))?;
        Ok(())
    }
}

fn run_reg_command(command: &mut Command, context_message: &str) -> Result<CommandOutput> {
    if !cfg!(windows) {
        return Err(anyhow!(
            "{context_message}: registry access is supported only on Windows hosts"
        ));
    }
    run_command_output(command, context_message)
}

/// Extracts the data column from `reg query` output for a single string value.
pub fn parse_reg_query_value(stdout: &str) -> Option<String> {
    for line in stdout.lines() {
        for value_type in ["REG_EXPAND_SZ", "REG_SZ"] {
            let Some(index) = find_type_column(line, value_type) else {
                continue;
            };
            let data = line[index + value_type.len()..].trim_start().trim_end_matches(['\r', '\n']);
            if data == "(value not set)" {
                return None;
            }
            return Some(data.to_string());
        }
    }
    None
}

// The type column is whitespace-delimited; a bare substring search would also hit value data.
fn find_type_column(line: &str, value_type: &str) -> Option<usize> {
    let mut search_from = 0;
    while let Some(offset) = line[search_from..].find(value_type) {
        let index = search_from + offset;
        let before_ok = index == 0
            || line[..index]
                .chars()
                .next_back()
                .is_some_and(char::is_whitespace);
        let after = &line[index + value_type.len()..];
        let after_ok = after.is_empty() || after.starts_with(char::is_whitespace);
        if before_ok && after_ok {
            return Some(index);
        }
        search_from = index + value_type.len();
    }
    None
}
