use anyhow::{Context, Result};
use ccmenu_core::Config;
use std::path::{Path, PathBuf};

pub fn default_state_dir() -> Result<PathBuf> {
    if cfg!(windows) {
        let app_data = std::env::var("LOCALAPPDATA")
            .context("LOCALAPPDATA is not set; cannot resolve Windows state directory")?;
        return Ok(PathBuf::from(app_data).join("ccmenu"));
    }

    let home = std::env::var("HOME").context("HOME is not set; cannot resolve state directory")?;
    Ok(PathBuf::from(home).join(".ccmenu"))
}

pub fn resolve_state_dir(config: &Config) -> Result<PathBuf> {
    match &config.state_dir {
        Some(dir) => Ok(dir.clone()),
        None => default_state_dir(),
    }
}

pub fn action_journal_path(state_dir: &Path) -> PathBuf {
    state_dir.join("actions.jsonl")
}
