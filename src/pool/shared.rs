use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Notify, Semaphore};
use tracing::debug;

use crate::error::{PoolError, TaskError};

use super::config::PoolConfig;
use super::counters::PoolCounters;
use super::task::Task;
use super::worker;

/// Queue plus worker bookkeeping. Guarded by one mutex that is never held
/// across an await point; every mutation republishes the gauges.
#[derive(Default)]
struct QueueState {
    tasks: VecDeque<Task>,
    live_workers: usize,
    idle_workers: usize,
    running_workers: usize,
    closed: bool,
}

pub(super) enum Dequeue {
    Task(Task),
    Empty,
    Stop,
}

pub(super) struct Shared {
    pub(super) config: PoolConfig,
    pub(super) counters: PoolCounters,
    /// One permit per free queue slot.
    pub(super) slots: Semaphore,
    state: Mutex<QueueState>,
    work_ready: Notify,
    drained: Notify,
    idle: Notify,
    next_worker_id: AtomicUsize,
}

impl Shared {
    pub(super) fn new(config: PoolConfig) -> Self {
        Self {
            config,
            counters: PoolCounters::default(),
            slots: Semaphore::new(config.max_queue_size),
            state: Mutex::new(QueueState::default()),
            work_ready: Notify::new(),
            drained: Notify::new(),
            idle: Notify::new(),
            next_worker_id: AtomicUsize::new(0),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        // Nothing panics while the lock is held, so a poisoned guard still
        // holds consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &QueueState) {
        self.counters.publish_gauges(
            state.running_workers,
            state.idle_workers,
            state.tasks.len(),
        );
    }

    /// Appends a task for which a queue slot has already been reserved.
    pub(super) fn enqueue(this: &Arc<Self>, task: Task) -> Result<(), PoolError> {
        let spawn_worker = {
            let mut state = this.lock_state();
            if state.closed {
                drop(state);
                this.slots.add_permits(1);
                return Err(PoolError::Closed);
            }
            this.counters.record_submitted();
            state.tasks.push_back(task);
            let spawn = state.live_workers < this.config.max_workers
                && state.tasks.len() > state.idle_workers;
            if spawn {
                state.live_workers = state.live_workers.saturating_add(1);
                state.idle_workers = state.idle_workers.saturating_add(1);
            }
            this.publish(&state);
            spawn
        };

        this.work_ready.notify_one();
        if spawn_worker {
            let id = this.next_worker_id.fetch_add(1, Ordering::Relaxed);
            debug!(worker = id, "spawning pool worker");
            tokio::spawn(worker::run(Arc::clone(this), id));
        }
        Ok(())
    }

    /// Pops the queue head for an idle worker, or tells it to stop when the
    /// pool is closed and nothing is left.
    pub(super) fn dequeue(&self) -> Dequeue {
        let mut state = self.lock_state();
        if let Some(task) = state.tasks.pop_front() {
            state.idle_workers = state.idle_workers.saturating_sub(1);
            state.running_workers = state.running_workers.saturating_add(1);
            self.publish(&state);
            drop(state);
            self.slots.add_permits(1);
            return Dequeue::Task(task);
        }
        if state.closed {
            self.retire_locked(&mut state);
            return Dequeue::Stop;
        }
        Dequeue::Empty
    }

    /// Retires an idle worker whose keep-alive expired, unless work arrived
    /// in the meantime.
    pub(super) fn retire_if_idle(&self) -> bool {
        let mut state = self.lock_state();
        if !state.tasks.is_empty() {
            return false;
        }
        self.retire_locked(&mut state);
        true
    }

    fn retire_locked(&self, state: &mut QueueState) {
        state.live_workers = state.live_workers.saturating_sub(1);
        state.idle_workers = state.idle_workers.saturating_sub(1);
        self.publish(state);
        if state.live_workers == 0 {
            self.drained.notify_waiters();
        }
    }

    /// Classifies a finished task and returns its worker to the idle set.
    pub(super) fn finish(&self, worker_id: usize, outcome: Result<(), TaskError>) {
        let drained = {
            let mut state = self.lock_state();
            match outcome {
                Ok(()) => self.counters.record_success(),
                Err(err) => {
                    tracing::warn!(worker = worker_id, error = %err, "task failed");
                    self.counters.record_failure();
                }
            }
            state.running_workers = state.running_workers.saturating_sub(1);
            state.idle_workers = state.idle_workers.saturating_add(1);
            self.publish(&state);
            self.counters.is_drained()
        };
        if drained {
            self.idle.notify_waiters();
        }
    }

    pub(super) fn is_closed(&self) -> bool {
        self.lock_state().closed
    }

    pub(super) fn close(&self) {
        {
            let mut state = self.lock_state();
            if state.closed {
                return;
            }
            state.closed = true;
            self.slots.close();
        }
        debug!("pool closed");
        self.work_ready.notify_waiters();
    }

    pub(super) const fn work_ready(&self) -> &Notify {
        &self.work_ready
    }

    pub(super) async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.counters.is_drained() {
                return;
            }
            notified.await;
        }
    }

    pub(super) async fn wait_drained(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            let live_workers = self.lock_state().live_workers;
            if live_workers == 0 {
                return;
            }
            notified.await;
        }
    }
}
