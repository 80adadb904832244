//! Quote-of-the-day service.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Config, HitokotoResponse, Quote};
use crate::utils::HttpGateway;

/// Fetches the daily quote from the Hitokoto API.
pub struct QuoteClient {
    config: Arc<Config>,
    gateway: Arc<dyn HttpGateway>,
}

impl QuoteClient {
    pub fn new(config: Arc<Config>, gateway: Arc<dyn HttpGateway>) -> Self {
        Self { config, gateway }
    }

    /// Fetch one quote.
    pub async fn fetch(&self) -> Result<Quote> {
        let notifier = &self.config.notifier;
        let body = self
            .gateway
            .get_json(&notifier.quote_url, notifier.quote_timeout())
            .await?;
        let response: HitokotoResponse = serde_json::from_value(body)?;
        Ok(response.into())
    }

    /// Fetch one quote, falling back to the placeholder pair on any failure.
    pub async fn fetch_or_placeholder(&self) -> Quote {
        log::info!("Fetching quote of the day: {}", self.config.notifier.quote_url);
        match self.fetch().await {
            Ok(quote) => {
                log::info!("Quote of the day: 『{}』- {}", quote.text, quote.source);
                quote
            }
            Err(e) => {
                log::warn!("Failed to fetch quote of the day: {}", e);
                Quote::placeholder()
            }
        }
    }
}
