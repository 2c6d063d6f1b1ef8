use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("Pool '{field}' must be >= 1 (got {value}).")]
    InvalidParameter { field: &'static str, value: usize },
    #[error("Pool is shut down and no longer accepts tasks.")]
    Closed,
    #[error("Pool queue is full.")]
    QueueFull,
    #[error("Timed out after {timeout:?} waiting for pool workers to drain.")]
    DrainTimeout { timeout: Duration },
}
