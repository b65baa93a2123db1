use anyhow::{Context, Result};
use ccmenu_core::{Action, TargetState};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    Ok,
    Failed,
    Skipped,
    VerificationFailed,
}

/// One line of the diagnostic trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub seq: u64,
    pub run_id: String,
    pub at_unix: u64,
    pub target: String,
    pub action: String,
    pub component: String,
    pub outcome: ActionOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Append-only JSON-lines record of every attempted action. Without a path it only keeps memory.
#[derive(Debug)]
pub struct ActionJournal {
    path: Option<PathBuf>,
    run_id: String,
    target: TargetState,
    next_seq: u64,
    records: Vec<ActionRecord>,
}

impl ActionJournal {
    pub fn open(path: impl Into<PathBuf>, target: TargetState) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        Ok(Self {
            path: Some(path),
            ..Self::in_memory(target)
        })
    }

    pub fn in_memory(target: TargetState) -> Self {
        let started_at = current_unix_timestamp().unwrap_or_default();
        Self {
            path: None,
            run_id: format!("run-{started_at}-{}", std::process::id()),
            target,
            next_seq: 1,
            records: Vec::new(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    pub fn record(
        &mut self,
        action: Action,
        outcome: ActionOutcome,
        detail: Option<String>,
    ) -> Result<()> {
        let record = ActionRecord {
            seq: self.next_seq,
            run_id: self.run_id.clone(),
            at_unix: current_unix_timestamp()?,
            target: self.target.as_str().to_string(),
            action: action.token(),
            component: action.component().as_str().to_string(),
            outcome,
            detail,
        };
        self.next_seq += 1;
        self.records.push(record.clone());

        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut line =
            serde_json::to_string(&record).context("failed to serialize action record")?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open action journal: {}", path.display()))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("failed to append action journal: {}", path.display()))?;
        file.flush()
            .with_context(|| format!("failed to flush action journal: {}", path.display()))?;
        Ok(())
    }
}

pub fn read_action_journal(path: &Path) -> Result<Vec<ActionRecord>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read action journal: {}", path.display()));
        }
    };

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| {
            serde_json::from_str(line).with_context(|| {
                format!(
                    "failed to parse action journal line {} in {}",
                    index + 1,
                    path.display()
                )
            })
        })
        .collect()
}

pub fn current_unix_timestamp() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system time is before unix epoch")?
        .as_secs())
}
