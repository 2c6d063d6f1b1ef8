use std::time::Duration;

use crate::error::PoolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_workers: usize,
    pub max_queue_size: usize,
    /// Workers idle for this long retire; `None` keeps them until shutdown.
    pub idle_timeout: Option<Duration>,
    /// Tasks running longer than this are abandoned and counted as failed.
    pub task_timeout: Option<Duration>,
}

impl PoolConfig {
    #[must_use]
    pub const fn new(max_workers: usize, max_queue_size: usize) -> Self {
        Self {
            max_workers,
            max_queue_size,
            idle_timeout: None,
            task_timeout: None,
        }
    }

    #[must_use]
    pub const fn with_idle_timeout(mut self, idle_timeout: Option<Duration>) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    #[must_use]
    pub const fn with_task_timeout(mut self, task_timeout: Option<Duration>) -> Self {
        self.task_timeout = task_timeout;
        self
    }

    pub(super) const fn validate(&self) -> Result<(), PoolError> {
        if self.max_workers == 0 {
            return Err(PoolError::InvalidParameter {
                field: "max_workers",
                value: self.max_workers,
            });
        }
        if self.max_queue_size == 0 {
            return Err(PoolError::InvalidParameter {
                field: "max_queue_size",
                value: self.max_queue_size,
            });
        }
        Ok(())
    }
}
