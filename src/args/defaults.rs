pub(crate) const DEFAULT_USER_AGENT: &str = concat!("bulkfetch/", env!("CARGO_PKG_VERSION"));

pub(crate) const DEFAULT_WORKERS: &str = "10";
pub(crate) const DEFAULT_BATCH_SIZE: &str = "100";
pub(crate) const DEFAULT_LISTEN: &str = "0.0.0.0:8080";
pub(crate) const DEFAULT_REQUEST_TIMEOUT: &str = "30s";
pub(crate) const DEFAULT_CONNECT_TIMEOUT: &str = "10s";
pub(crate) const DEFAULT_DRAIN_TIMEOUT: &str = "30s";
