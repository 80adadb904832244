// src/services/archive.rs

//! Archive fetcher service.
//!
//! Queries each configured archive endpoint once and turns the `images`
//! array into [`WallpaperRecord`]s. A failing endpoint is logged and skipped.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{ArchiveResponse, Config, WallpaperRecord};
use crate::utils::HttpGateway;

/// An endpoint that could not be used this run.
#[derive(Debug, Clone)]
pub struct EndpointFailure {
    pub endpoint: String,
    pub reason: String,
}

/// Summary of a fetch over all endpoints.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub records: Vec<WallpaperRecord>,
    pub endpoint_total: usize,
    pub failures: Vec<EndpointFailure>,
}

impl FetchReport {
    /// True when no endpoint produced a usable record.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Service for fetching wallpaper metadata from the image archive.
pub struct ArchiveFetcher {
    config: Arc<Config>,
    gateway: Arc<dyn HttpGateway>,
}

impl ArchiveFetcher {
    pub fn new(config: Arc<Config>, gateway: Arc<dyn HttpGateway>) -> Self {
        Self { config, gateway }
    }

    /// Fetch records from every endpoint, in order.
    pub async fn fetch_all(&self) -> FetchReport {
        let endpoints = &self.config.fetcher.endpoints;
        let mut report = FetchReport {
            endpoint_total: endpoints.len(),
            ..FetchReport::default()
        };

        for (idx, endpoint) in endpoints.iter().enumerate() {
            log::info!(
                "Fetching archive endpoint {}/{}: {}",
                idx + 1,
                endpoints.len(),
                endpoint
            );

            match self.fetch_endpoint(endpoint).await {
                Ok(records) => {
                    log::debug!("{} records from {}", records.len(), endpoint);
                    report.records.extend(records);
                }
                Err(error) => {
                    log::warn!("Failed to fetch archive endpoint {}: {}", endpoint, error);
                    report.failures.push(EndpointFailure {
                        endpoint: endpoint.clone(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        report
    }

    /// Fetch and decode a single endpoint.
    async fn fetch_endpoint(&self, endpoint: &str) -> Result<Vec<WallpaperRecord>> {
        let fetcher = &self.config.fetcher;
        let body = self.gateway.get_json(endpoint, fetcher.timeout()).await?;
        let response: ArchiveResponse = serde_json::from_value(body)?;

        let records = response
            .images
            .into_iter()
            .filter_map(|image| image.into_record(&fetcher.image_host, &fetcher.image_suffix))
            .filter(|record| {
                if record.has_safe_key() {
                    true
                } else {
                    log::warn!("Ignoring record with unusable enddate {:?}", record.enddate);
                    false
                }
            })
            .collect();

        Ok(records)
    }
}
