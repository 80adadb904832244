//! Bing wallpaper archiver CLI
//!
//! Running without arguments performs one archive run against the default
//! storage directory. Scheduling is left to cron or CI.

use std::path::PathBuf;
use std::sync::Arc;

use bing_archiver::{
    error::{AppError, Result},
    models::Config,
    pipeline::{self, RunOutcome},
    storage::{LocalStorage, WallpaperStorage},
    utils::ReqwestGateway,
};
use clap::{Parser, Subcommand};

/// Archive Bing daily wallpapers and announce new ones
#[derive(Parser, Debug)]
#[command(name = "bing-archiver", version, about = "Bing wallpaper archiver")]
struct Cli {
    /// Directory holding the history file and downloaded images
    #[arg(short, long, default_value = "Bing_Wallpaper")]
    storage_dir: PathBuf,

    /// Configuration file (default: {storage_dir}/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch, store, download and notify (default)
    Run,

    /// Validate configuration
    Validate,

    /// Show history info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = match &cli.config {
        Some(path) if !path.exists() => {
            return Err(AppError::config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        Some(path) => path.clone(),
        None => cli.storage_dir.join("config.toml"),
    };
    let config = Config::load_or_default(&config_path).with_webhook_from_env();
    let storage = LocalStorage::from_config(&cli.storage_dir, &config);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            log::info!("Bing archiver starting...");
            tokio::fs::create_dir_all(&cli.storage_dir).await?;

            let gateway = Arc::new(ReqwestGateway::new(&config.fetcher)?);
            let outcome = pipeline::run_archiver(Arc::new(config), &storage, gateway).await?;

            match outcome {
                RunOutcome::Aborted => log::warn!("Run aborted, nothing was fetched"),
                RunOutcome::Completed(report) => {
                    log::info!(
                        "Run complete in {}s: {} fetched, {} in history, {} downloaded, {} notified ({} failed)",
                        (report.end_time - report.start_time).num_seconds(),
                        report.fetched,
                        report.history_count,
                        report.downloaded,
                        report.notifications.sent,
                        report.notifications.failed
                    );
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} endpoints, webhook {})",
                config.fetcher.endpoints.len(),
                if config.notifier.webhook().is_some() {
                    "configured"
                } else {
                    "not configured"
                }
            );
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());

            let history = storage.load_history().await?;
            match (history.first(), history.last()) {
                (Some(oldest), Some(newest)) => {
                    log::info!("History: {} records", history.len());
                    log::info!("Oldest: {}", oldest.enddate);
                    log::info!("Newest: {}", newest.enddate);
                }
                _ => log::info!("No history found yet."),
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
