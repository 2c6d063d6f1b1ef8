use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeederError {
    #[error("Failed to read id file '{path}': {source}")]
    ReadIdFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Id file '{path}' was empty.")]
    IdFileEmpty { path: PathBuf },
    #[error("Base URL '{template}' has no '{{id}}' or '%s' placeholder.")]
    MissingPlaceholder { template: String },
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
}
