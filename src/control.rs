//! JSON control surface. One request object in, one response object out;
//! transport framing (stdin lines, in production) lives in the binary.

use crate::engine::{Engine, RunResult};
use crate::history::ExecutionRecord;
use crate::store::Store;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How many log entries `getStatus` reports.
const RECENT_LOGS: usize = 5;

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ControlRequest {
    GetStatus,
    ToggleEnabled,
    ExecuteNow,
    GetSettings,
    #[serde(rename_all = "camelCase")]
    UpdateSettings {
        #[serde(default)]
        comments: Option<Vec<String>>,
        #[serde(default)]
        is_enabled: Option<bool>,
    },
    ClearExecutionLog,
    ClearParticipation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub success: bool,
    pub is_enabled: bool,
    pub last_execution_time: Option<DateTime<Utc>>,
    pub is_running: bool,
    pub recent_logs: Vec<ExecutionRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub success: bool,
    pub is_enabled: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub success: bool,
    pub comments: Vec<String>,
    pub is_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ControlResponse {
    Status(StatusResponse),
    Toggle(ToggleResponse),
    Run(RunResult),
    Settings(SettingsResponse),
    Ack(AckResponse),
    Error(ErrorResponse),
}

impl ControlResponse {
    fn ack() -> Self {
        Self::Ack(AckResponse { success: true })
    }

    fn error(message: impl Into<String>) -> Self {
        Self::Error(ErrorResponse {
            success: false,
            error: message.into(),
        })
    }
}

/// Dispatches control requests against the engine and its store.
pub struct Controller {
    engine: Arc<Engine>,
}

impl Controller {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    fn store(&self) -> &Store {
        self.engine.store()
    }

    /// Handle one request line and produce one response line. Every
    /// outcome, including unparseable input, comes back as a JSON
    /// envelope rather than an error.
    pub async fn handle_line(&self, line: &str) -> String {
        let request: ControlRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(error = %e, "unparseable control request");
                return serialize(&ControlResponse::error("Unknown action"));
            }
        };
        serialize(&self.handle(request).await)
    }

    pub async fn handle(&self, request: ControlRequest) -> ControlResponse {
        match self.dispatch(request).await {
            Ok(response) => response,
            Err(e) => ControlResponse::error(format!("{e:#}")),
        }
    }

    async fn dispatch(&self, request: ControlRequest) -> Result<ControlResponse> {
        match request {
            ControlRequest::GetStatus => {
                let (is_enabled, last_execution_time, recent_logs) = self.store().read(|s| {
                    (
                        s.is_enabled,
                        s.last_execution_time,
                        s.execution_log.recent(RECENT_LOGS),
                    )
                });
                Ok(ControlResponse::Status(StatusResponse {
                    success: true,
                    is_enabled,
                    last_execution_time,
                    is_running: self.engine.is_running(),
                    recent_logs,
                }))
            }
            ControlRequest::ToggleEnabled => {
                let is_enabled = self.store().update(|s| {
                    s.is_enabled = !s.is_enabled;
                    s.is_enabled
                })?;
                tracing::info!(is_enabled, "automation toggled");
                Ok(ControlResponse::Toggle(ToggleResponse {
                    success: true,
                    is_enabled,
                }))
            }
            ControlRequest::ExecuteNow => Ok(ControlResponse::Run(self.engine.run().await)),
            ControlRequest::GetSettings => {
                let (comments, is_enabled) =
                    self.store().read(|s| (s.comments.clone(), s.is_enabled));
                Ok(ControlResponse::Settings(SettingsResponse {
                    success: true,
                    comments,
                    is_enabled,
                }))
            }
            ControlRequest::UpdateSettings {
                comments,
                is_enabled,
            } => {
                self.store().update(|s| {
                    if let Some(comments) = comments {
                        s.comments = comments;
                    }
                    if let Some(enabled) = is_enabled {
                        s.is_enabled = enabled;
                    }
                })?;
                Ok(ControlResponse::ack())
            }
            ControlRequest::ClearExecutionLog => {
                self.store().update(|s| s.execution_log.clear())?;
                Ok(ControlResponse::ack())
            }
            ControlRequest::ClearParticipation => {
                self.store().update(|s| s.participated_content_ids.clear())?;
                Ok(ControlResponse::ack())
            }
        }
    }
}

fn serialize(response: &ControlResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|_| {
        r#"{"success":false,"error":"internal serialization failure"}"#.to_string()
    })
}
