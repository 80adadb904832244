//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Environment variable holding the DingTalk robot webhook URL.
pub const WEBHOOK_ENV: &str = "DINGTALK_WEBHOOK";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Archive API settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Image download settings
    #[serde(default)]
    pub downloader: DownloaderConfig,

    /// Quote and webhook settings
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// File layout inside the storage directory
    #[serde(default)]
    pub paths: PathsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No config file at {:?}, using defaults", path);
            return Self::default();
        }

        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Config load failed from {:?}: {}. Using defaults.", path, e);
            Self::default()
        })
    }

    /// Override the webhook with the value of `DINGTALK_WEBHOOK`, if set.
    pub fn with_webhook_from_env(mut self) -> Self {
        if let Ok(value) = std::env::var(WEBHOOK_ENV) {
            self.notifier.webhook_url = Some(value);
        }
        self
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.endpoints.is_empty() {
            return Err(AppError::validation("fetcher.endpoints is empty"));
        }
        for endpoint in &self.fetcher.endpoints {
            Url::parse(endpoint).map_err(|e| {
                AppError::validation(format!("fetcher.endpoints: '{endpoint}' is not a URL: {e}"))
            })?;
        }
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }
        if self.fetcher.timeout_secs == 0 {
            return Err(AppError::validation("fetcher.timeout_secs must be > 0"));
        }
        if self.downloader.timeout_secs == 0 {
            return Err(AppError::validation("downloader.timeout_secs must be > 0"));
        }
        if self.notifier.quote_timeout_secs == 0 {
            return Err(AppError::validation(
                "notifier.quote_timeout_secs must be > 0",
            ));
        }
        if self.notifier.webhook_timeout_secs == 0 {
            return Err(AppError::validation(
                "notifier.webhook_timeout_secs must be > 0",
            ));
        }
        Url::parse(&self.notifier.quote_url)?;
        if let Some(webhook) = self.notifier.webhook() {
            Url::parse(webhook)?;
        }
        if self.paths.history_file.trim().is_empty() {
            return Err(AppError::validation("paths.history_file is empty"));
        }
        Ok(())
    }
}

/// Archive API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Archive endpoints, queried in order
    #[serde(default = "defaults::endpoints")]
    pub endpoints: Vec<String>,

    /// Host prepended to each `urlbase`
    #[serde(default = "defaults::image_host")]
    pub image_host: String,

    /// Suffix appended to each `urlbase` to select the resolution
    #[serde(default = "defaults::image_suffix")]
    pub image_suffix: String,

    /// User-Agent header for every outbound request
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::fetch_timeout")]
    pub timeout_secs: u64,
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            endpoints: defaults::endpoints(),
            image_host: defaults::image_host(),
            image_suffix: defaults::image_suffix(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::fetch_timeout(),
        }
    }
}

/// Image download settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloaderConfig {
    /// Locale part of the file name
    #[serde(default = "defaults::locale_suffix")]
    pub locale_suffix: String,

    /// Resolution part of the file name
    #[serde(default = "defaults::resolution_tag")]
    pub resolution_tag: String,

    /// Download timeout in seconds
    #[serde(default = "defaults::download_timeout")]
    pub timeout_secs: u64,
}

impl DownloaderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            locale_suffix: defaults::locale_suffix(),
            resolution_tag: defaults::resolution_tag(),
            timeout_secs: defaults::download_timeout(),
        }
    }
}

/// Quote service and webhook settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Quote-of-the-day endpoint
    #[serde(default = "defaults::quote_url")]
    pub quote_url: String,

    #[serde(default = "defaults::quote_timeout")]
    pub quote_timeout_secs: u64,

    /// DingTalk robot webhook; `None` or blank disables notification
    #[serde(default)]
    pub webhook_url: Option<String>,

    #[serde(default = "defaults::webhook_timeout")]
    pub webhook_timeout_secs: u64,
}

impl NotifierConfig {
    /// The configured webhook, treating a blank value as unset.
    pub fn webhook(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn quote_timeout(&self) -> Duration {
        Duration::from_secs(self.quote_timeout_secs)
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_secs(self.webhook_timeout_secs)
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            quote_url: defaults::quote_url(),
            quote_timeout_secs: defaults::quote_timeout(),
            webhook_url: None,
            webhook_timeout_secs: defaults::webhook_timeout(),
        }
    }
}

/// File names inside the storage directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// History store, relative to the storage directory
    #[serde(default = "defaults::history_file")]
    pub history_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            history_file: defaults::history_file(),
        }
    }
}

mod defaults {
    // Fetcher defaults
    pub fn endpoints() -> Vec<String> {
        vec![
            "https://cn.bing.com/HPImageArchive.aspx?format=js&idx=8&n=8".into(),
            "https://cn.bing.com/HPImageArchive.aspx?format=js&idx=0&n=8".into(),
        ]
    }
    pub fn image_host() -> String {
        "https://cn.bing.com".into()
    }
    pub fn image_suffix() -> String {
        "_UHD.jpg".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".into()
    }
    pub fn fetch_timeout() -> u64 {
        10
    }

    // Downloader defaults
    pub fn locale_suffix() -> String {
        "zh-cn".into()
    }
    pub fn resolution_tag() -> String {
        "UHD".into()
    }
    pub fn download_timeout() -> u64 {
        30
    }

    // Notifier defaults
    pub fn quote_url() -> String {
        "https://v1.hitokoto.cn/".into()
    }
    pub fn quote_timeout() -> u64 {
        10
    }
    pub fn webhook_timeout() -> u64 {
        15
    }

    // Path defaults
    pub fn history_file() -> String {
        "bing.json".into()
    }
}
