use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Oldest entries are evicted once the log holds this many runs.
pub const LOG_CAPACITY: usize = 50;

/// Outcome of one completed participation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    pub timestamp: DateTime<Utc>,
    /// Campaigns actually liked and commented this run.
    pub processed_count: usize,
    /// Campaigns discovered before filtering.
    pub total_count: usize,
    /// Campaigns that passed the status filter.
    pub new_count: usize,
    pub skipped_count: usize,
    #[serde(default)]
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

/// FIFO run history, capped at [`LOG_CAPACITY`] entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionLog(VecDeque<ExecutionRecord>);

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ExecutionRecord) {
        self.0.push_back(record);
        while self.0.len() > LOG_CAPACITY {
            self.0.pop_front();
        }
    }

    /// The `n` most recent entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<ExecutionRecord> {
        let skip = self.0.len().saturating_sub(n);
        self.0.iter().skip(skip).cloned().collect()
    }

    pub fn last(&self) -> Option<&ExecutionRecord> {
        self.0.back()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}
