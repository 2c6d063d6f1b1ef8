use super::{ConfigFormat, RunConfig, apply_config, load_config, load_config_file, types::DurationValue};
use clap::{CommandFactory, FromArgMatches};
use std::time::Duration;
use tempfile::tempdir;

use crate::args::RunArgs;
use crate::error::{AppError, AppResult, ConfigError};

fn parse_with_config(cli: &[&str], config_path: &std::path::Path) -> AppResult<RunArgs> {
    let matches = RunArgs::command().try_get_matches_from(cli)?;
    let mut args = RunArgs::from_arg_matches(&matches)?;
    let config = load_config_file(config_path)?;
    apply_config(&mut args, &matches, &config)?;
    Ok(args)
}

#[test]
fn parse_toml_config_with_short_key_aliases() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("bulkfetch.toml");
    let content = r#"
c = 4
n = 25
filePath = "ids.txt"
baseUrl = "http://localhost:3000/items/%s"
"#;
    std::fs::write(&path, content)?;

    let config = load_config_file(&path)?;
    if config.workers != Some(4) {
        return Err(AppError::config("Unexpected workers"));
    }
    if config.batch_size != Some(25) {
        return Err(AppError::config("Unexpected batch_size"));
    }
    if config.file_path.as_deref() != Some("ids.txt") {
        return Err(AppError::config("Unexpected file_path"));
    }
    if config.base_url.as_deref() != Some("http://localhost:3000/items/%s") {
        return Err(AppError::config("Unexpected base_url"));
    }
    Ok(())
}

#[test]
fn parse_json_config_with_durations() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("bulkfetch.json");
    let content = r#"{
  "workers": 8,
  "file_path": "ids.txt",
  "base_url": "http://localhost/{id}",
  "idle_timeout": 5,
  "request_timeout": "1500ms",
  "count_request_errors": false
}"#;
    std::fs::write(&path, content)?;

    let config = load_config_file(&path)?;
    match config.idle_timeout {
        Some(DurationValue::Seconds(5)) => {}
        other => {
            return Err(AppError::config(format!(
                "Unexpected idle_timeout: {:?}",
                other
            )));
        }
    }
    let timeout = config
        .request_timeout
        .as_ref()
        .map(DurationValue::to_duration)
        .transpose()?;
    if timeout != Some(Duration::from_millis(1500)) {
        return Err(AppError::config("Unexpected request_timeout"));
    }
    if config.count_request_errors != Some(false) {
        return Err(AppError::config("Unexpected count_request_errors"));
    }
    Ok(())
}

#[test]
fn unsupported_extension_is_rejected() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("bulkfetch.yaml");
    std::fs::write(&path, "c: 1\n")?;

    match load_config_file(&path) {
        Err(AppError::Config(ConfigError::UnsupportedExtension { ext })) if ext == "yaml" => Ok(()),
        other => Err(AppError::config(format!(
            "Expected unsupported extension, got {:?}",
            other.map(|_| ())
        ))),
    }
}

#[test]
fn cli_values_override_config_values() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("bulkfetch.toml");
    let content = r#"
workers = 4
batch_size = 25
file_path = "from-config.txt"
base_url = "http://config/{id}"
drain_timeout = "2m"
"#;
    std::fs::write(&path, content)?;

    let args = parse_with_config(&["bulkfetch", "-c", "7", "-f", "from-cli.txt"], &path)?;
    if args.workers.get() != 7 {
        return Err(AppError::config("CLI workers should win"));
    }
    if args.file.as_deref() != Some("from-cli.txt") {
        return Err(AppError::config("CLI file should win"));
    }
    if args.batch_size.get() != 25 {
        return Err(AppError::config("Config batch_size should beat default"));
    }
    if args.base_url.as_deref() != Some("http://config/{id}") {
        return Err(AppError::config("Config base_url should apply"));
    }
    if args.drain_timeout != Duration::from_secs(120) {
        return Err(AppError::config("Config drain_timeout should apply"));
    }
    Ok(())
}

#[test]
fn zero_workers_in_config_is_rejected() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("bulkfetch.toml");
    std::fs::write(&path, "workers = 0\n")?;

    match parse_with_config(&["bulkfetch"], &path) {
        Err(AppError::Config(ConfigError::FieldMustBePositive { field, .. }))
            if field == "workers" =>
        {
            Ok(())
        }
        other => Err(AppError::config(format!(
            "Expected FieldMustBePositive, got {:?}",
            other.map(|_| ())
        ))),
    }
}

#[test]
fn invalid_duration_in_config_names_field() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("bulkfetch.toml");
    std::fs::write(&path, "task_timeout = \"10x\"\n")?;

    match parse_with_config(&["bulkfetch"], &path) {
        Err(AppError::Config(ConfigError::InvalidDuration { field, .. }))
            if field == "task_timeout" =>
        {
            Ok(())
        }
        other => Err(AppError::config(format!(
            "Expected InvalidDuration, got {:?}",
            other.map(|_| ())
        ))),
    }
}

#[test]
fn run_config_defaults_queue_size_to_batch_size() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("bulkfetch.toml");
    std::fs::write(
        &path,
        "file_path = \"ids.txt\"\nbase_url = \"http://localhost/%s\"\nbatch_size = 40\n",
    )?;

    let args = parse_with_config(&["bulkfetch", "-c", "3"], &path)?;
    let run = RunConfig::from_args(&args)?;
    if run.queue_size != 40 {
        return Err(AppError::config(format!(
            "Unexpected queue_size: {}",
            run.queue_size
        )));
    }
    let pool = run.pool_config();
    if pool.max_workers != 3 || pool.max_queue_size != 40 {
        return Err(AppError::config("Unexpected pool config"));
    }
    Ok(())
}

#[test]
fn run_config_requires_file_and_base_url() -> AppResult<()> {
    let matches = RunArgs::command().try_get_matches_from(["bulkfetch", "-u", "http://x/{id}"])?;
    let args = RunArgs::from_arg_matches(&matches)?;
    match RunConfig::from_args(&args) {
        Err(AppError::Validation(crate::error::ValidationError::MissingFile)) => {}
        other => {
            return Err(AppError::config(format!(
                "Expected MissingFile, got {:?}",
                other.map(|_| ())
            )));
        }
    }

    let matches = RunArgs::command().try_get_matches_from(["bulkfetch", "-f", "ids.txt"])?;
    let args = RunArgs::from_arg_matches(&matches)?;
    match RunConfig::from_args(&args) {
        Err(AppError::Validation(crate::error::ValidationError::MissingBaseUrl)) => Ok(()),
        other => Err(AppError::config(format!(
            "Expected MissingBaseUrl, got {:?}",
            other.map(|_| ())
        ))),
    }
}

#[test]
fn config_format_follows_extension() -> AppResult<()> {
    let cases = [
        ("bulkfetch.toml", Some(ConfigFormat::Toml)),
        ("settings.json", Some(ConfigFormat::Json)),
        ("config.yaml", None),
        ("config", None),
    ];
    for (name, expected) in cases {
        let format = ConfigFormat::from_path(std::path::Path::new(name)).ok();
        if format != expected {
            return Err(AppError::config(format!(
                "Unexpected format for {}: {:?}",
                name, format
            )));
        }
    }
    Ok(())
}

#[test]
fn explicit_config_path_must_exist() -> AppResult<()> {
    let dir = tempdir()?;
    let path = dir.path().join("absent.toml");
    match load_config(path.to_str()) {
        Err(AppError::Config(ConfigError::ReadConfig { .. })) => Ok(()),
        other => Err(AppError::config(format!(
            "Expected ReadConfig, got {:?}",
            other.map(|_| ())
        ))),
    }
}
