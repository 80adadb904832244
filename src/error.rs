// src/error.rs

//! Unified error handling for the archiver.

use std::fmt;

use thiserror::Error;

/// Result type alias for archiver operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Server answered with a non-success status
    #[error("HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    /// No progress within the allowed time
    #[error("Timed out after {after:?} waiting for {url}")]
    Timeout { url: String, after: std::time::Duration },

    /// Webhook accepted the request but reported a failure
    #[error("Webhook rejected message: errcode {code}, errmsg {message}")]
    Webhook { code: i64, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a status error for a response that was not 2xx.
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Self::Status {
            url: url.into(),
            status,
        }
    }

    /// Create a timeout error.
    pub fn timeout(url: impl Into<String>, limit: std::time::Duration) -> Self {
        Self::Timeout {
            url: url.into(),
            after: limit,
        }
    }

    /// Create a webhook rejection error.
    pub fn webhook(code: i64, message: impl fmt::Display) -> Self {
        Self::Webhook {
            code,
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = AppError::status("https://example.com/a", 503);
        assert_eq!(err.to_string(), "HTTP status 503 from https://example.com/a");
    }

    #[test]
    fn test_timeout_display() {
        let err = AppError::timeout("https://example.com/a.jpg", std::time::Duration::from_millis(300));
        assert_eq!(
            err.to_string(),
            "Timed out after 300ms waiting for https://example.com/a.jpg"
        );
    }

    #[test]
    fn test_webhook_display() {
        let err = AppError::webhook(310000, "keywords not in content");
        assert_eq!(
            err.to_string(),
            "Webhook rejected message: errcode 310000, errmsg keywords not in content"
        );
    }
}
