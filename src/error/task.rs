use std::time::Duration;

use thiserror::Error;

/// Why a task was classified as failed.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("{message}")]
    Failed { message: String },
    #[error("Task panicked: {message}")]
    Panicked { message: String },
    #[error("Task exceeded its {timeout:?} time limit.")]
    TimedOut { timeout: Duration },
    #[error("Request to '{url}' failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to '{url}' returned status {status}.")]
    Status { url: String, status: u16 },
    #[error("Blocking task join error: {source}")]
    Join {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl TaskError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}
