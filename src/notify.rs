use async_trait::async_trait;
use serde_json::json;

/// Outcome sink for finished runs. Delivery is best effort; a notifier
/// that fails must never fail the run it is reporting on.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn run_completed(&self, processed: usize);
    async fn run_failed(&self, reason: &str);
}

/// Default sink: outcomes land in the log stream and nowhere else.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn run_completed(&self, processed: usize) {
        tracing::info!(processed, "run completed");
    }

    async fn run_failed(&self, reason: &str) {
        tracing::warn!(reason, "run failed");
    }
}

/// POSTs run outcomes to an operator-supplied URL.
pub struct Webhook {
    client: reqwest::Client,
    url: String,
}

impl Webhook {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    async fn post(&self, payload: serde_json::Value) {
        match self.client.post(&self.url).json(&payload).send().await {
            Ok(resp) if !resp.status().is_success() => {
                tracing::warn!(status = %resp.status(), "notification webhook rejected payload");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "notification webhook unreachable");
            }
        }
    }
}

#[async_trait]
impl Notifier for Webhook {
    async fn run_completed(&self, processed: usize) {
        self.post(json!({ "event": "run_completed", "processed": processed }))
            .await;
    }

    async fn run_failed(&self, reason: &str) {
        self.post(json!({ "event": "run_failed", "reason": reason }))
            .await;
    }
}
