use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde::Serialize;

use super::config::PoolConfig;

/// Lock-free mirror of the pool state. Monotonic counters are bumped and
/// gauges are stored while the queue lock is held, so a reader never sees a
/// task counted as completed before it was counted as submitted.
#[derive(Debug, Default)]
pub(super) struct PoolCounters {
    running_workers: AtomicUsize,
    idle_workers: AtomicUsize,
    waiting_tasks: AtomicUsize,
    submitted_tasks: AtomicU64,
    successful_tasks: AtomicU64,
    failed_tasks: AtomicU64,
}

impl PoolCounters {
    pub(super) fn record_submitted(&self) {
        self.submitted_tasks.fetch_add(1, Ordering::AcqRel);
    }

    pub(super) fn record_success(&self) {
        self.successful_tasks.fetch_add(1, Ordering::AcqRel);
    }

    pub(super) fn record_failure(&self) {
        self.failed_tasks.fetch_add(1, Ordering::AcqRel);
    }

    pub(super) fn publish_gauges(&self, running: usize, idle: usize, waiting: usize) {
        self.running_workers.store(running, Ordering::Release);
        self.idle_workers.store(idle, Ordering::Release);
        self.waiting_tasks.store(waiting, Ordering::Release);
    }

    pub(super) fn running_workers(&self) -> usize {
        self.running_workers.load(Ordering::Acquire)
    }

    pub(super) fn idle_workers(&self) -> usize {
        self.idle_workers.load(Ordering::Acquire)
    }

    pub(super) fn waiting_tasks(&self) -> usize {
        self.waiting_tasks.load(Ordering::Acquire)
    }

    pub(super) fn submitted_tasks(&self) -> u64 {
        self.submitted_tasks.load(Ordering::Acquire)
    }

    pub(super) fn successful_tasks(&self) -> u64 {
        self.successful_tasks.load(Ordering::Acquire)
    }

    pub(super) fn failed_tasks(&self) -> u64 {
        self.failed_tasks.load(Ordering::Acquire)
    }

    pub(super) fn completed_tasks(&self) -> u64 {
        self.successful_tasks()
            .saturating_add(self.failed_tasks())
    }

    pub(super) fn is_drained(&self) -> bool {
        self.completed_tasks() >= self.submitted_tasks()
    }

    pub(super) fn snapshot(&self, config: &PoolConfig) -> PoolStats {
        let successful_tasks = self.successful_tasks();
        let failed_tasks = self.failed_tasks();
        PoolStats {
            max_workers: config.max_workers,
            max_queue_size: config.max_queue_size,
            running_workers: self.running_workers(),
            idle_workers: self.idle_workers(),
            submitted_tasks: self.submitted_tasks(),
            waiting_tasks: self.waiting_tasks(),
            successful_tasks,
            failed_tasks,
            completed_tasks: successful_tasks.saturating_add(failed_tasks),
        }
    }
}

/// Point-in-time view of the pool counters.
///
/// Each field is read independently; fields may be skewed by a transition
/// that happens while the snapshot is taken, except `completed_tasks`, which
/// is always the sum of the two classification counters in the same snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    pub max_workers: usize,
    pub max_queue_size: usize,
    pub running_workers: usize,
    pub idle_workers: usize,
    pub submitted_tasks: u64,
    pub waiting_tasks: usize,
    pub successful_tasks: u64,
    pub failed_tasks: u64,
    pub completed_tasks: u64,
}
