use clap::{ArgAction, Parser};
use std::time::Duration;

use super::defaults::{
    DEFAULT_BATCH_SIZE, DEFAULT_CONNECT_TIMEOUT, DEFAULT_DRAIN_TIMEOUT, DEFAULT_LISTEN,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_WORKERS,
};
use super::parsers::{parse_bool_env, parse_duration_arg, parse_positive_usize};
use super::types::PositiveUsize;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Fetch one URL per identifier from a file through a bounded worker pool, with live pool metrics on /metrics."
)]
pub struct RunArgs {
    /// Path to config file (TOML/JSON). Defaults to ./bulkfetch.toml or ./bulkfetch.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// File with one identifier per line
    #[arg(long = "file", short = 'f')]
    pub file: Option<String>,

    /// URL template; the identifier replaces '{id}' or the first '%s'
    #[arg(long = "base-url", short = 'u')]
    pub base_url: Option<String>,

    /// Maximum number of concurrent workers
    #[arg(
        long = "workers",
        short = 'c',
        alias = "concurrency",
        default_value = DEFAULT_WORKERS,
        value_parser = parse_positive_usize
    )]
    pub workers: PositiveUsize,

    /// Identifiers submitted per batch
    #[arg(
        long = "batch-size",
        short = 'n',
        default_value = DEFAULT_BATCH_SIZE,
        value_parser = parse_positive_usize
    )]
    pub batch_size: PositiveUsize,

    /// Tasks allowed to wait for a worker before submit blocks (defaults to the batch size)
    #[arg(long = "queue-size", short = 'q', value_parser = parse_positive_usize)]
    pub queue_size: Option<PositiveUsize>,

    /// Address of the metrics listener
    #[arg(long = "listen", default_value = DEFAULT_LISTEN)]
    pub listen: String,

    /// Retire workers idle for this long (supports ms/s/m/h)
    #[arg(long = "idle-timeout", value_parser = parse_duration_arg)]
    pub idle_timeout: Option<Duration>,

    /// Fail tasks running longer than this (supports ms/s/m/h)
    #[arg(long = "task-timeout", value_parser = parse_duration_arg)]
    pub task_timeout: Option<Duration>,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(
        long = "request-timeout",
        default_value = DEFAULT_REQUEST_TIMEOUT,
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// Connection timeout (supports ms/s/m/h)
    #[arg(
        long = "connect-timeout",
        default_value = DEFAULT_CONNECT_TIMEOUT,
        value_parser = parse_duration_arg
    )]
    pub connect_timeout: Duration,

    /// Count transport errors and non-success statuses as failed tasks
    #[arg(
        long = "count-request-errors",
        default_value = "true",
        action = ArgAction::Set,
        value_parser = parse_bool_env
    )]
    pub count_request_errors: bool,

    /// Exit once every identifier was processed instead of serving metrics until interrupted
    #[arg(long = "exit-when-done")]
    pub exit_when_done: bool,

    /// How long shutdown waits for in-flight tasks (supports ms/s/m/h)
    #[arg(
        long = "drain-timeout",
        default_value = DEFAULT_DRAIN_TIMEOUT,
        value_parser = parse_duration_arg
    )]
    pub drain_timeout: Duration,

    /// Enable verbose logging (sets log level to debug unless overridden by BULKFETCH_LOG/RUST_LOG)
    #[arg(long, short = 'v', alias = "debug")]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}
