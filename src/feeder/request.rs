use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::args::DEFAULT_USER_AGENT;
use crate::config::RunConfig;
use crate::error::{FeederError, TaskError};
use crate::pool::{Task, TaskResult};

/// Builds GET tasks that share one connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    count_request_errors: bool,
}

impl Fetcher {
    #[must_use]
    pub const fn new(client: Client, count_request_errors: bool) -> Self {
        Self {
            client,
            count_request_errors,
        }
    }

    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn from_config(config: &RunConfig) -> Result<Self, FeederError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|err| FeederError::BuildClientFailed { source: err })?;
        Ok(Self::new(client, config.count_request_errors))
    }

    #[must_use]
    pub fn fetch_task(&self, url: Url) -> Task {
        let client = self.client.clone();
        let count_request_errors = self.count_request_errors;
        Task::new(async move {
            match fetch(&client, url).await {
                Err(err) if !count_request_errors => {
                    debug!("Ignoring request error: {}", err);
                    Ok(())
                }
                result => result,
            }
        })
    }
}

async fn fetch(client: &Client, url: Url) -> TaskResult {
    let target = url.to_string();
    let mut response = client
        .get(url)
        .send()
        .await
        .map_err(|err| TaskError::Request {
            url: target.clone(),
            source: err,
        })?;
    let status = response.status();
    while response
        .chunk()
        .await
        .map_err(|err| TaskError::Request {
            url: target.clone(),
            source: err,
        })?
        .is_some()
    {}
    if !status.is_success() {
        return Err(TaskError::Status {
            url: target,
            status: status.as_u16(),
        });
    }
    Ok(())
}
