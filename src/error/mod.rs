mod app;
mod config;
mod feeder;
mod metrics;
mod pool;
mod task;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use feeder::FeederError;
pub use metrics::MetricsError;
pub use pool::PoolError;
pub use task::TaskError;
pub use validation::ValidationError;
