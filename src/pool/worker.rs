use std::sync::Arc;

use tracing::debug;

use super::shared::{Dequeue, Shared};
use super::task::Task;

/// Worker loop: pull the queue head, run it behind the failure boundary,
/// report the outcome, repeat until the pool closes or the keep-alive expires.
pub(super) async fn run(shared: Arc<Shared>, id: usize) {
    debug!(worker = id, "worker started");
    while let Some(task) = next_task(&shared).await {
        let outcome = task.run(shared.config.task_timeout).await;
        shared.finish(id, outcome);
    }
    debug!(worker = id, "worker stopped");
}

async fn next_task(shared: &Shared) -> Option<Task> {
    loop {
        // Register for wakeups before looking at the queue so a submit or a
        // close that lands in between is not missed.
        let notified = shared.work_ready().notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        match shared.dequeue() {
            Dequeue::Task(task) => return Some(task),
            Dequeue::Stop => return None,
            Dequeue::Empty => {}
        }

        match shared.config.idle_timeout {
            Some(keep_alive) => {
                if tokio::time::timeout(keep_alive, notified).await.is_err()
                    && shared.retire_if_idle()
                {
                    return None;
                }
            }
            None => notified.await,
        }
    }
}
