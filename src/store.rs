use crate::history::ExecutionLog;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Comment pool used until the operator provides their own.
pub const DEFAULT_COMMENTS: [&str; 5] = [
    "응원합니다!",
    "좋은 일에 함께할 수 있어 기쁩니다.",
    "의미있는 활동이네요!",
    "작은 힘이지만 보탭니다.",
    "함께 만들어가요!",
];

/// Everything the bot persists between restarts. Field names match the
/// on-disk JSON, so a state file survives upgrades key for key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotState {
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    #[serde(default = "default_comments")]
    pub comments: Vec<String>,
    #[serde(default)]
    pub last_execution_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub participated_content_ids: Vec<u64>,
    #[serde(default)]
    pub execution_log: ExecutionLog,
}

fn default_enabled() -> bool {
    true
}

fn default_comments() -> Vec<String> {
    DEFAULT_COMMENTS.iter().map(|s| s.to_string()).collect()
}

impl Default for BotState {
    fn default() -> Self {
        Self {
            is_enabled: true,
            comments: default_comments(),
            last_execution_time: None,
            participated_content_ids: Vec::new(),
            execution_log: ExecutionLog::new(),
        }
    }
}

/// JSON-file-backed state store. Reads go through a closure so callers
/// never hold the lock across an await point; writes rewrite the whole
/// file atomically via a temp file in the same directory.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    state: Mutex<BotState>,
}

impl Store {
    /// Load state from `path`, seeding defaults for a missing file or for
    /// any keys an older file does not carry. The merged state is written
    /// back immediately so the file on disk is always complete.
    pub fn open(path: &Path) -> Result<Self> {
        let state = match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse state file: {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no state file found, starting fresh");
                BotState::default()
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read state file: {}", path.display()))
            }
        };

        let store = Self {
            path: path.to_path_buf(),
            state: Mutex::new(state),
        };
        store.persist()?;
        Ok(store)
    }

    pub fn read<T>(&self, f: impl FnOnce(&BotState) -> T) -> T {
        f(&self.lock())
    }

    /// Mutate state and flush it to disk in one step. The lock is held
    /// through the disk write, so concurrent updates reach the file in
    /// mutation order and the last rename always carries the newest state.
    pub fn update<T>(&self, f: impl FnOnce(&mut BotState) -> T) -> Result<T> {
        let mut state = self.lock();
        let out = f(&mut state);
        self.write_snapshot(&state)?;
        Ok(out)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BotState> {
        // A poisoned lock still holds a coherent state; keep serving it.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn persist(&self) -> Result<()> {
        self.write_snapshot(&self.lock())
    }

    /// Replace the state file with `state`. Callers hold the state lock.
    fn write_snapshot(&self, state: &BotState) -> Result<()> {
        let json = serde_json::to_string_pretty(state).context("Failed to serialize state")?;
        let dir = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))
            .context("Failed to create temp state file")?;
        tmp.write_all(json.as_bytes())
            .context("Failed to write temp state file")?;
        tmp.flush().context("Failed to flush temp state file")?;
        tmp.as_file_mut()
            .sync_all()
            .context("Failed to sync temp state file")?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to replace state file: {}", self.path.display()))?;
        Ok(())
    }
}
