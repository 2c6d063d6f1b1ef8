use std::time::Duration;

use serde::Deserialize;

use crate::args::parsers::parse_duration;
use crate::error::ValidationError;

/// On-disk configuration. Every field is optional; CLI values win.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(alias = "c", alias = "concurrency")]
    pub workers: Option<usize>,
    #[serde(alias = "n")]
    pub batch_size: Option<usize>,
    pub queue_size: Option<usize>,
    #[serde(alias = "filePath")]
    pub file_path: Option<String>,
    #[serde(alias = "baseUrl")]
    pub base_url: Option<String>,
    pub listen: Option<String>,
    pub idle_timeout: Option<DurationValue>,
    pub task_timeout: Option<DurationValue>,
    pub request_timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub drain_timeout: Option<DurationValue>,
    pub count_request_errors: Option<bool>,
    pub exit_when_done: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(0) => Err(ValidationError::DurationZero),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration(text),
        }
    }
}
