use anyhow::{anyhow, Context, Result};
use std::process::Command;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub status: String,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn succeeded(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            status: "exit code: 0".to_string(),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            status: "exit code: 1".to_string(),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn into_success(self, context_message: &str) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        Err(anyhow!(
            "{context_message}: status={} stdout='{}' stderr='{}'",
            self.status,
            self.stdout.trim(),
            self.stderr.trim()
        ))
    }
}

/// Spawns `command` and captures its output; only a failure to start is an error.
pub fn run_command_output(command: &mut Command, context_message: &str) -> Result<CommandOutput> {
    let output = command
        .output()
        .with_context(|| format!("{context_message}: command failed to start"))?;
    Ok(CommandOutput {
        success: output.status.success(),
        status: output.status.to_string(),
        stdout: decode_console_output(&output.stdout),
        stderr: decode_console_output(&output.stderr),
    })
}

pub fn describe_command(command: &Command) -> String {
    let mut parts = vec![command.get_program().to_string_lossy().into_owned()];
    parts.extend(
        command
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned()),
    );
    parts.join(" ")
}

/// `wsl.exe` writes UTF-16LE to pipes while most tools write UTF-8.
pub fn decode_console_output(bytes: &[u8]) -> String {
    let decoded = if looks_like_utf16le(bytes) {
        let units = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect::<Vec<_>>();
        String::from_utf16_lossy(&units)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    };

    decoded
        .chars()
        .filter(|ch| *ch != '\0' && *ch != '\u{feff}')
        .collect()
}

fn looks_like_utf16le(bytes: &[u8]) -> bool {
    if bytes.starts_with(&[0xff, 0xfe]) {
        return true;
    }
    if bytes.len() < 2 || bytes.len() % 2 != 0 {
        return false;
    }
    let odd_zeros = bytes.iter().skip(1).step_by(2).filter(|b| **b == 0).count();
    odd_zeros * 2 >= bytes.len() / 2
}
