//! Bounded-concurrency worker pool.
//!
//! Tasks are queued in submission order and executed by at most
//! `max_workers` workers running as Tokio tasks. The queue holds at most
//! `max_queue_size` tasks that have not started yet; [`WorkerPool::submit`]
//! waits for a free slot when it is full, which throttles the producer to the
//! pool's throughput.
//!
//! Every task is classified exactly once as successful or failed. A task fails
//! when it returns an error, panics, or exceeds the configured task timeout;
//! the worker that ran it keeps serving the queue either way.
//!
//! Counters are plain atomics, so the accessors can be polled from a metrics
//! endpoint at any rate without contending with the dispatch path.
mod config;
mod counters;
mod shared;
mod task;
mod worker;


use std::sync::Arc;
use std::time::Duration;

use tokio::sync::TryAcquireError;

use crate::error::PoolError;

use shared::Shared;

pub use config::PoolConfig;
pub use counters::PoolStats;
pub use task::{Task, TaskResult};

pub struct WorkerPool {
    shared: Arc<Shared>,
}

impl WorkerPool {
    /// Creates a pool with the given bounds and no idle or task timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidParameter`] when either bound is zero.
    pub fn with_bounds(max_workers: usize, max_queue_size: usize) -> Result<Self, PoolError> {
        Self::new(PoolConfig::new(max_workers, max_queue_size))
    }

    /// Creates a pool from a validated configuration. No worker is spawned
    /// until the first task arrives.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidParameter`] when either bound is zero.
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        Ok(Self {
            shared: Arc::new(Shared::new(config)),
        })
    }

    /// Submits a task, waiting for a queue slot when the queue is full.
    ///
    /// Must be called from within a Tokio runtime; workers are spawned on it.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Closed`] once [`WorkerPool::shutdown`] has begun.
    /// The task is dropped without running in that case.
    pub async fn submit(&self, task: Task) -> Result<(), PoolError> {
        let permit = self
            .shared
            .slots
            .acquire()
            .await
            .map_err(|_closed| PoolError::Closed)?;
        permit.forget();
        Shared::enqueue(&self.shared, task)
    }

    /// Submits a task without waiting.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::QueueFull`] when no queue slot is free and
    /// [`PoolError::Closed`] once shutdown has begun.
    pub fn try_submit(&self, task: Task) -> Result<(), PoolError> {
        match self.shared.slots.try_acquire() {
            Ok(permit) => permit.forget(),
            Err(TryAcquireError::NoPermits) => return Err(PoolError::QueueFull),
            Err(TryAcquireError::Closed) => return Err(PoolError::Closed),
        }
        Shared::enqueue(&self.shared, task)
    }

    /// Resolves once every submitted task has completed. The pool stays open.
    pub async fn wait_idle(&self) {
        self.shared.wait_idle().await;
    }

    /// Stops accepting tasks, lets the workers drain the queue, and resolves
    /// once all of them have exited. Calling it again is a no-op.
    pub async fn shutdown(&self) {
        self.shared.close();
        self.shared.wait_drained().await;
    }

    /// Same as [`WorkerPool::shutdown`] but gives up waiting after `timeout`.
    /// Workers that are still running keep draining in the background.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::DrainTimeout`] when the workers did not finish in
    /// time.
    pub async fn shutdown_timeout(&self, timeout: Duration) -> Result<(), PoolError> {
        tokio::time::timeout(timeout, self.shutdown())
            .await
            .map_err(|_elapsed| PoolError::DrainTimeout { timeout })
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    #[must_use]
    pub fn max_workers(&self) -> usize {
        self.shared.config.max_workers
    }

    #[must_use]
    pub fn max_queue_size(&self) -> usize {
        self.shared.config.max_queue_size
    }

    /// Workers currently executing a task.
    #[must_use]
    pub fn running_workers(&self) -> usize {
        self.shared.counters.running_workers()
    }

    /// Live workers waiting for a task.
    #[must_use]
    pub fn idle_workers(&self) -> usize {
        self.shared.counters.idle_workers()
    }

    #[must_use]
    pub fn submitted_tasks(&self) -> u64 {
        self.shared.counters.submitted_tasks()
    }

    /// Tasks accepted but not started yet.
    #[must_use]
    pub fn waiting_tasks(&self) -> usize {
        self.shared.counters.waiting_tasks()
    }

    #[must_use]
    pub fn successful_tasks(&self) -> u64 {
        self.shared.counters.successful_tasks()
    }

    #[must_use]
    pub fn failed_tasks(&self) -> u64 {
        self.shared.counters.failed_tasks()
    }

    /// Always equal to `successful_tasks() + failed_tasks()`.
    #[must_use]
    pub fn completed_tasks(&self) -> u64 {
        self.shared.counters.completed_tasks()
    }

    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.shared.counters.snapshot(&self.shared.config)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shared.close();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("max_workers", &self.shared.config.max_workers)
            .field("max_queue_size", &self.shared.config.max_queue_size)
            .field("stats", &self.stats())
            .finish()
    }
}
