use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::time::Duration;

use futures_util::FutureExt;
use tracing::debug;

use crate::error::TaskError;

pub type TaskResult = Result<(), TaskError>;

type TaskFuture = Pin<Box<dyn Future<Output = TaskResult> + Send + 'static>>;
type BlockingWork = Box<dyn FnOnce() -> TaskResult + Send + 'static>;

enum Body {
    Async(TaskFuture),
    Blocking(BlockingWork),
}

/// A unit of work owned by the pool from submission until it completes.
pub struct Task {
    body: Body,
}

impl Task {
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = TaskResult> + Send + 'static,
    {
        Self {
            body: Body::Async(Box::pin(future)),
        }
    }

    /// Wraps a blocking closure; it runs on Tokio's blocking thread pool so it
    /// never stalls the worker's executor thread.
    ///
    /// A blocking closure cannot be cancelled. When it outlives the task
    /// timeout it is still classified as timed out, but its worker stays busy
    /// until the closure returns.
    pub fn blocking<F>(work: F) -> Self
    where
        F: FnOnce() -> TaskResult + Send + 'static,
    {
        Self {
            body: Body::Blocking(Box::new(work)),
        }
    }

    /// Runs the task to completion. Panics and timeouts are turned into
    /// errors here so they never unwind into the worker loop.
    pub(super) async fn run(self, timeout: Option<Duration>) -> TaskResult {
        match self.body {
            Body::Async(future) => run_async(future, timeout).await,
            Body::Blocking(work) => run_blocking(work, timeout).await,
        }
    }
}

async fn run_async(future: TaskFuture, timeout: Option<Duration>) -> TaskResult {
    let guarded = AssertUnwindSafe(future).catch_unwind();
    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, guarded).await {
            Ok(outcome) => outcome,
            Err(_elapsed) => return Err(TaskError::TimedOut { timeout: limit }),
        },
        None => guarded.await,
    };
    outcome.unwrap_or_else(|payload| {
        Err(TaskError::Panicked {
            message: panic_message(payload),
        })
    })
}

/// The worker is released only after the closure has returned, so a timed-out
/// closure never overlaps the next task on the same worker.
async fn run_blocking(work: BlockingWork, timeout: Option<Duration>) -> TaskResult {
    let mut handle = tokio::task::spawn_blocking(work);
    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, &mut handle).await {
            Ok(joined) => joined,
            Err(_elapsed) => {
                debug!("blocking task exceeded {:?}; waiting for it to return", limit);
                drop(handle.await);
                return Err(TaskError::TimedOut { timeout: limit });
            }
        },
        None => handle.await,
    };
    match joined {
        Ok(result) => result,
        Err(err) if err.is_panic() => Err(TaskError::Panicked {
            message: panic_message(err.into_panic()),
        }),
        Err(err) => Err(TaskError::Join { source: err }),
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task").finish_non_exhaustive()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        return (*message).to_owned();
    }
    match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(_other) => "non-string panic payload".to_owned(),
    }
}
