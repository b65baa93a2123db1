use anyhow::{Context, Result};
use ccmenu_core::{
    render_launcher_script, ComponentState, Config, DEFAULT_LAUNCHER_DIR, DEFAULT_LAUNCHER_PATH,
};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::fs_utils::{remove_dir_if_empty, remove_file_if_exists};

/// The on-disk launcher script referenced by the registry commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherArtifact {
    path: PathBuf,
    template: String,
    owned_dir: Option<PathBuf>,
}

impl LauncherArtifact {
    pub fn new(path: impl Into<PathBuf>, template: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            template: template.into(),
            owned_dir: None,
        }
    }

    /// Only the default location owns its directory; a custom path may sit
    /// in a folder the user keeps.
    pub fn from_config(config: &Config) -> Self {
        let artifact = Self::new(&config.launcher_path, render_launcher_script(config));
        if config.launcher_path == Path::new(DEFAULT_LAUNCHER_PATH) {
            artifact.with_owned_dir(DEFAULT_LAUNCHER_DIR)
        } else {
            artifact
        }
    }

    pub fn with_owned_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.owned_dir = Some(dir.into());
        self
    }

    pub fn owned_dir(&self) -> Option<&Path> {
        self.owned_dir.as_deref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&self.path, self.template.as_bytes()).with_context(|| {
            format!("failed to write launcher script: {}", self.path.display())
        })
    }

    /// Also drops the owned directory once nothing else lives there.
    pub fn remove(&self) -> Result<()> {
        remove_file_if_exists(&self.path).with_context(|| {
            format!("failed to remove launcher script: {}", self.path.display())
        })?;
        if let (Some(parent), Some(owned)) = (self.path.parent(), self.owned_dir()) {
            if parent == owned {
                let _ = remove_dir_if_empty(parent);
            }
        }
        Ok(())
    }

    pub fn matches_current_template(&self) -> bool {
        fs::read(&self.path)
            .map(|bytes| bytes == self.template.as_bytes())
            .unwrap_or(false)
    }

    pub fn state(&self) -> ComponentState {
        match fs::read(&self.path) {
            Ok(bytes) if bytes == self.template.as_bytes() => ComponentState::Installed(None),
            Ok(_) => ComponentState::Stale,
            Err(_) => ComponentState::Absent,
        }
    }

    /// sha256 of the file currently on disk, if there is one.
    pub fn content_digest(&self) -> Result<Option<String>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(sha256_hex(&bytes))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| {
                format!("failed to read launcher script: {}", self.path.display())
            }),
        }
    }

    pub fn template_digest(&self) -> String {
        sha256_hex(self.template.as_bytes())
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
