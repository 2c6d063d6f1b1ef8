//! Configuration loading, merging, and resolution into a [`RunConfig`].
pub(crate) mod apply;
mod loader;
mod run;
pub mod types;

#[cfg(test)]
mod tests;

pub use apply::apply_config;
pub use loader::load_config;
pub use run::RunConfig;

#[cfg(test)]
pub(crate) use loader::{ConfigFormat, load_config_file};
