//! Turns an identifier file into HTTP GET tasks and feeds them to the pool in
//! shuffled batches.
mod ids;
mod request;
mod template;


use tracing::{debug, info, warn};

use crate::config::RunConfig;
use crate::error::{AppResult, FeederError, PoolError};
use crate::pool::WorkerPool;
use crate::shutdown::ShutdownReceiver;

pub use ids::{batches, load_ids, shuffle_ids};
pub use request::Fetcher;
pub use template::UrlTemplate;

/// What a feeder run managed to submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedSummary {
    pub submitted: u64,
    pub skipped: u64,
    pub batches: usize,
    pub stopped_early: bool,
}

pub struct Feeder {
    ids: Vec<String>,
    batch_size: usize,
    template: UrlTemplate,
    fetcher: Fetcher,
}

impl Feeder {
    #[must_use]
    pub const fn new(
        ids: Vec<String>,
        batch_size: usize,
        template: UrlTemplate,
        fetcher: Fetcher,
    ) -> Self {
        Self {
            ids,
            batch_size,
            template,
            fetcher,
        }
    }

    /// Loads and shuffles the identifier file and prepares the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error when the id file is unreadable or empty, the base URL
    /// template is invalid, or the HTTP client cannot be built.
    pub fn from_config(config: &RunConfig) -> Result<Self, FeederError> {
        let template = UrlTemplate::parse(&config.base_url)?;
        let ids = shuffle_ids(load_ids(&config.file_path)?);
        let fetcher = Fetcher::from_config(config)?;
        Ok(Self::new(ids, config.batch_size, template, fetcher))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Submits one GET task per identifier, batch by batch. Waits whenever the
    /// pool queue is full. Stops early when the pool closes or a shutdown
    /// signal arrives.
    ///
    /// # Errors
    ///
    /// Returns an error only for pool failures other than closing.
    pub async fn run(
        &self,
        pool: &WorkerPool,
        mut shutdown_rx: ShutdownReceiver,
    ) -> AppResult<FeedSummary> {
        let mut summary = FeedSummary::default();
        let total_batches = self.ids.len().div_ceil(self.batch_size.max(1));

        'batches: for batch in batches(&self.ids, self.batch_size) {
            summary.batches = summary.batches.saturating_add(1);
            for id in batch {
                let url = match self.template.render(id) {
                    Ok(url) => url,
                    Err(err) => {
                        warn!("Skipping id '{}': {}", id, err);
                        summary.skipped = summary.skipped.saturating_add(1);
                        continue;
                    }
                };
                debug!("fetching: {}", url);
                let task = self.fetcher.fetch_task(url);
                tokio::select! {
                    biased;
                    Ok(()) = shutdown_rx.recv() => {
                        info!("Shutdown requested; feeder stopped submitting.");
                        summary.stopped_early = true;
                        break 'batches;
                    }
                    result = pool.submit(task) => match result {
                        Ok(()) => summary.submitted = summary.submitted.saturating_add(1),
                        Err(PoolError::Closed) => {
                            info!("Pool closed; feeder stopped submitting.");
                            summary.stopped_early = true;
                            break 'batches;
                        }
                        Err(err) => return Err(err.into()),
                    }
                }
            }
            info!(
                "Submitted batch {}/{} ({} tasks so far).",
                summary.batches, total_batches, summary.submitted
            );
        }

        Ok(summary)
    }
}
