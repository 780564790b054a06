pub mod actions;
pub mod discovery;
pub mod pacing;
pub mod participation;

use crate::config::{DiscoveryConfig, PacingConfig};
use crate::history::ExecutionRecord;
use crate::notify::Notifier;
use crate::store::Store;
use crate::together::{ContentSource, Fundraising, FundraisingStatus};
use chrono::Utc;
use participation::ParticipationSet;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Outcome of one `run()` invocation, also the wire shape for the
/// `executeNow` control action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub success: bool,
    pub processed_count: usize,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunResult {
    fn completed(processed: usize, errors: Vec<String>) -> Self {
        Self {
            success: true,
            processed_count: processed,
            errors,
            message: None,
            error: None,
        }
    }

    /// Success with nothing to do.
    fn idle(message: &str) -> Self {
        Self {
            success: true,
            processed_count: 0,
            errors: Vec::new(),
            message: Some(message.to_string()),
            error: None,
        }
    }

    /// Refused before any work started.
    fn rejected(reason: &str) -> Self {
        Self {
            success: false,
            processed_count: 0,
            errors: Vec::new(),
            message: None,
            error: Some(reason.to_string()),
        }
    }

    /// Aborted by a structural failure mid-run.
    fn failed(reason: String, processed: usize, errors: Vec<String>) -> Self {
        Self {
            success: false,
            processed_count: processed,
            errors,
            message: None,
            error: Some(reason),
        }
    }
}

/// Orchestrates one participation sweep: discovery, status filter, the
/// like/comment pipeline, then a single persistence write. At most one
/// sweep runs at a time; concurrent triggers are rejected, not queued.
pub struct Engine {
    source: Arc<dyn ContentSource>,
    store: Arc<Store>,
    notifier: Arc<dyn Notifier>,
    discovery: DiscoveryConfig,
    pacing: PacingConfig,
    running: AtomicBool,
}

impl Engine {
    pub fn new(
        source: Arc<dyn ContentSource>,
        store: Arc<Store>,
        notifier: Arc<dyn Notifier>,
        discovery: DiscoveryConfig,
        pacing: PacingConfig,
    ) -> Self {
        Self {
            source,
            store,
            notifier,
            discovery,
            pacing,
            running: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Execute one sweep. Returns a rejection result if a sweep is
    /// already in flight or automation is disabled. The guard is
    /// released on every exit path.
    pub async fn run(&self) -> RunResult {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return RunResult::rejected("a run is already in progress");
        }
        let result = self.sweep().await;
        self.running.store(false, Ordering::SeqCst);
        result
    }

    async fn sweep(&self) -> RunResult {
        if !self.store.read(|s| s.is_enabled) {
            return RunResult::rejected("automation is disabled");
        }

        let started_at = Utc::now();
        let timer = Instant::now();
        let (comments, ids) = self
            .store
            .read(|s| (s.comments.clone(), s.participated_content_ids.clone()));
        let mut seen = ParticipationSet::from_ids(ids);

        let found = match discovery::collect_new(
            self.source.as_ref(),
            &seen,
            &self.discovery,
            &self.pacing,
        )
        .await
        {
            Ok(found) => found,
            Err(e) => {
                let reason = format!("discovery failed: {e}");
                tracing::error!(error = %e, "discovery failed");
                self.notifier.run_failed(&reason).await;
                return RunResult::failed(reason, 0, Vec::new());
            }
        };

        let total = found.len();
        let eligible: Vec<Fundraising> = found
            .into_iter()
            .filter(|f| f.status == FundraisingStatus::Funding)
            .collect();
        let skipped = total - eligible.len();
        tracing::info!(total, eligible = eligible.len(), skipped, "discovery finished");

        if eligible.is_empty() {
            return RunResult::idle("no new fundraisings to join");
        }

        let summary = match actions::participate(
            self.source.as_ref(),
            &eligible,
            &comments,
            &self.pacing,
            &mut seen,
        )
        .await
        {
            Ok(summary) => summary,
            Err(e) => {
                let reason = e.to_string();
                tracing::error!(error = %reason, "participation aborted");
                self.notifier.run_failed(&reason).await;
                return RunResult::failed(reason, 0, Vec::new());
            }
        };

        let record = ExecutionRecord {
            timestamp: started_at,
            processed_count: summary.processed,
            total_count: total,
            new_count: eligible.len(),
            skipped_count: skipped,
            errors: summary.errors.clone(),
            duration_ms: timer.elapsed().as_millis() as u64,
        };

        if let Err(e) = self.store.update(|s| {
            s.participated_content_ids = seen.to_sorted_vec();
            s.last_execution_time = Some(started_at);
            s.execution_log.push(record);
        }) {
            let reason = format!("state persistence failed: {e:#}");
            tracing::error!("{reason}");
            self.notifier.run_failed(&reason).await;
            return RunResult::failed(reason, summary.processed, summary.errors);
        }

        tracing::info!(
            processed = summary.processed,
            failed = summary.errors.len(),
            "run complete"
        );
        if summary.processed > 0 {
            self.notifier.run_completed(summary.processed).await;
        }
        RunResult::completed(summary.processed, summary.errors)
    }
}
