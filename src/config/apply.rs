use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveUsize, RunArgs};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::{ConfigFile, DurationValue};

/// Applies configuration values to CLI arguments that were not given on the command line.
///
/// # Errors
///
/// Returns an error when a config value is out of range or not a valid duration.
pub fn apply_config(args: &mut RunArgs, matches: &ArgMatches, config: &ConfigFile) -> AppResult<()> {
    if !is_cli(matches, "file")
        && let Some(path) = config.file_path.clone()
    {
        args.file = Some(path);
    }

    if !is_cli(matches, "base_url")
        && let Some(base_url) = config.base_url.clone()
    {
        args.base_url = Some(base_url);
    }

    if !is_cli(matches, "workers")
        && let Some(workers) = config.workers
    {
        args.workers = ensure_positive_usize(workers, "workers")?;
    }

    if !is_cli(matches, "batch_size")
        && let Some(batch_size) = config.batch_size
    {
        args.batch_size = ensure_positive_usize(batch_size, "batch_size")?;
    }

    if !is_cli(matches, "queue_size")
        && let Some(queue_size) = config.queue_size
    {
        args.queue_size = Some(ensure_positive_usize(queue_size, "queue_size")?);
    }

    if !is_cli(matches, "listen")
        && let Some(listen) = config.listen.clone()
    {
        args.listen = listen;
    }

    if !is_cli(matches, "idle_timeout")
        && let Some(value) = config.idle_timeout.as_ref()
    {
        args.idle_timeout = Some(duration_field(value, "idle_timeout")?);
    }

    if !is_cli(matches, "task_timeout")
        && let Some(value) = config.task_timeout.as_ref()
    {
        args.task_timeout = Some(duration_field(value, "task_timeout")?);
    }

    if !is_cli(matches, "request_timeout")
        && let Some(value) = config.request_timeout.as_ref()
    {
        args.request_timeout = duration_field(value, "request_timeout")?;
    }

    if !is_cli(matches, "connect_timeout")
        && let Some(value) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = duration_field(value, "connect_timeout")?;
    }

    if !is_cli(matches, "drain_timeout")
        && let Some(value) = config.drain_timeout.as_ref()
    {
        args.drain_timeout = duration_field(value, "drain_timeout")?;
    }

    if !is_cli(matches, "count_request_errors")
        && let Some(count) = config.count_request_errors
    {
        args.count_request_errors = count;
    }

    if !is_cli(matches, "exit_when_done")
        && let Some(exit) = config.exit_when_done
    {
        args.exit_when_done = exit;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn ensure_positive_usize(value: usize, field: &str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn duration_field(value: &DurationValue, field: &str) -> AppResult<std::time::Duration> {
    value.to_duration().map_err(|err| {
        AppError::config(ConfigError::InvalidDuration {
            field: field.to_owned(),
            source: err,
        })
    })
}
