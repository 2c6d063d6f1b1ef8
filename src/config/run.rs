use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::args::RunArgs;
use crate::error::{AppError, AppResult, ValidationError};
use crate::pool::PoolConfig;

/// Fully resolved settings for one run, built once from CLI arguments and the
/// optional config file.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub file_path: PathBuf,
    pub base_url: String,
    pub workers: usize,
    pub batch_size: usize,
    pub queue_size: usize,
    pub listen: SocketAddr,
    pub idle_timeout: Option<Duration>,
    pub task_timeout: Option<Duration>,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub drain_timeout: Duration,
    pub count_request_errors: bool,
    pub exit_when_done: bool,
}

impl RunConfig {
    /// Resolves merged arguments into a run configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the id file or base URL is missing, or the listen
    /// address does not parse.
    pub fn from_args(args: &RunArgs) -> AppResult<Self> {
        let file_path = args
            .file
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| AppError::validation(ValidationError::MissingFile))?;
        let base_url = args
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| AppError::validation(ValidationError::MissingBaseUrl))?;
        let listen: SocketAddr = args.listen.trim().parse().map_err(|err| {
            AppError::validation(ValidationError::InvalidListenAddr {
                value: args.listen.clone(),
                source: err,
            })
        })?;
        let batch_size = args.batch_size.get();

        Ok(Self {
            file_path,
            base_url,
            workers: args.workers.get(),
            batch_size,
            queue_size: args.queue_size.map_or(batch_size, |size| size.get()),
            listen,
            idle_timeout: args.idle_timeout,
            task_timeout: args.task_timeout,
            request_timeout: args.request_timeout,
            connect_timeout: args.connect_timeout,
            drain_timeout: args.drain_timeout,
            count_request_errors: args.count_request_errors,
            exit_when_done: args.exit_when_done,
        })
    }

    #[must_use]
    pub const fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(self.workers, self.queue_size)
            .with_idle_timeout(self.idle_timeout)
            .with_task_timeout(self.task_timeout)
    }
}
