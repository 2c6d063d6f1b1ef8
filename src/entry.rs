use std::sync::Arc;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::{error, info, warn};

use bulkfetch::args::RunArgs;
use bulkfetch::config::{RunConfig, apply_config, load_config};
use bulkfetch::error::{AppError, AppResult, ValidationError};
use bulkfetch::feeder::Feeder;
use bulkfetch::metrics::MetricsServer;
use bulkfetch::pool::WorkerPool;
use bulkfetch::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};

pub(crate) fn run() -> AppResult<()> {
    let (args, matches) = parse_args()?;

    crate::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(ValidationError::RuntimeBuildFailed { source: err }))?;

    runtime
        .block_on(run_async(args, &matches))
        .inspect_err(|err| error!("{}", err))
}

fn parse_args() -> AppResult<(RunArgs, ArgMatches)> {
    let matches = RunArgs::command().get_matches();
    let args = RunArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

fn resolve_config(mut args: RunArgs, matches: &ArgMatches) -> AppResult<RunConfig> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, matches, &config)?;
    }
    RunConfig::from_args(&args)
}

async fn run_async(args: RunArgs, matches: &ArgMatches) -> AppResult<()> {
    let config = resolve_config(args, matches)?;
    let feeder = Feeder::from_config(&config)?;
    let pool = Arc::new(WorkerPool::new(config.pool_config())?);
    let server = MetricsServer::bind(config.listen, Arc::clone(&pool)).await?;
    info!(
        "Loaded {} ids from {}; {} workers, queue {}, batches of {}.",
        feeder.len(),
        config.file_path.display(),
        config.workers,
        config.queue_size,
        config.batch_size
    );

    let (shutdown_tx, mut shutdown_rx) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);
    let server_handle = tokio::spawn(server.serve(shutdown_tx.subscribe()));

    let summary = feeder.run(&pool, shutdown_tx.subscribe()).await?;
    info!(
        "Feeder finished: {} submitted, {} skipped.",
        summary.submitted, summary.skipped
    );

    if !summary.stopped_early {
        if config.exit_when_done {
            tokio::select! {
                () = pool.wait_idle() => info!("All tasks completed."),
                _ = shutdown_rx.recv() => {}
            }
        } else {
            info!("All ids submitted; serving metrics until interrupted.");
            drop(shutdown_rx.recv().await);
        }
    }

    drop(shutdown_tx.send(()));
    let drained = pool.shutdown_timeout(config.drain_timeout).await;
    signal_handle.abort();
    server_handle.await??;

    let stats = pool.stats();
    info!(
        "Done: {} submitted, {} successful, {} failed.",
        stats.submitted_tasks, stats.successful_tasks, stats.failed_tasks
    );
    if let Err(err) = drained {
        warn!("{}", err);
        return Err(AppError::pool(err));
    }
    Ok(())
}
