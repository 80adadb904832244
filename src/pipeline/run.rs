// src/pipeline/run.rs

//! Full archive run: fetch, reconcile, persist, download, notify.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::reconcile::{MergeSummary, reconcile};
use crate::services::{ArchiveFetcher, ImageDownloader, Notifier, NotifyReport, QuoteClient};
use crate::storage::WallpaperStorage;
use crate::utils::HttpGateway;

/// Statistics for a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub fetched: usize,
    pub endpoint_failures: usize,
    pub history_count: usize,
    pub merge: MergeSummary,
    pub downloaded: usize,
    pub skipped: usize,
    pub download_failures: usize,
    pub notifications: NotifyReport,
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// No endpoint returned a record; nothing was written.
    Aborted,
    Completed(RunReport),
}

/// Run the archiver once.
///
/// Only history persistence errors are returned; every network failure is
/// logged and absorbed by the stage that hit it.
///
/// The quote is only fetched when a webhook is configured and the run
/// downloaded something new.
pub async fn run_archiver(
    config: Arc<Config>,
    storage: &dyn WallpaperStorage,
    gateway: Arc<dyn HttpGateway>,
) -> Result<RunOutcome> {
    let start_time = Utc::now();

    // Step 1: Fetch
    log::info!("Step 1/4: Fetching wallpaper metadata...");
    let fetcher = ArchiveFetcher::new(Arc::clone(&config), Arc::clone(&gateway));
    let fetch = fetcher.fetch_all().await;
    if fetch.is_empty() {
        log::error!(
            "No wallpaper records fetched from {} endpoint(s), aborting",
            fetch.endpoint_total
        );
        return Ok(RunOutcome::Aborted);
    }
    log::info!(
        "Fetched {} records ({} of {} endpoints failed)",
        fetch.records.len(),
        fetch.failures.len(),
        fetch.endpoint_total
    );

    // Step 2: Reconcile and persist
    log::info!("Step 2/4: Reconciling history...");
    let history = storage.load_history().await?;
    let merged = reconcile(history, &fetch.records);
    let written = storage.save_history(&merged.records).await?;
    log::info!(
        "History saved to {}: {} records ({} added, {} replaced)",
        written.location,
        written.record_count,
        merged.summary.added,
        merged.summary.replaced
    );

    // Step 3: Download
    log::info!("Step 3/4: Downloading images...");
    let downloader = ImageDownloader::new(Arc::clone(&config), Arc::clone(&gateway));
    let downloads = downloader.download_all(storage, &merged.records).await;
    log::info!(
        "{} new, {} already present, {} failed",
        downloads.downloaded.len(),
        downloads.skipped,
        downloads.failed
    );

    // Step 4: Notify
    let notifications = if downloads.downloaded.is_empty() {
        log::info!("No new wallpapers, skipping quote and notifications");
        NotifyReport::default()
    } else {
        log::info!(
            "Step 4/4: Announcing {} new wallpaper(s)...",
            downloads.downloaded.len()
        );
        let notifier = Notifier::new(&config.notifier, Arc::clone(&gateway));
        if notifier.is_enabled() {
            let quote = QuoteClient::new(Arc::clone(&config), Arc::clone(&gateway))
                .fetch_or_placeholder()
                .await;
            notifier.notify_all(&downloads.downloaded, &quote).await
        } else {
            log::info!("Webhook not configured, skipping notifications");
            NotifyReport::default()
        }
    };

    Ok(RunOutcome::Completed(RunReport {
        start_time,
        end_time: Utc::now(),
        fetched: fetch.records.len(),
        endpoint_failures: fetch.failures.len(),
        history_count: merged.records.len(),
        merge: merged.summary,
        downloaded: downloads.downloaded.len(),
        skipped: downloads.skipped,
        download_failures: downloads.failed,
        notifications,
    }))
}
