// src/utils/http.rs

//! HTTP client utilities.
//!
//! Every outbound call goes through [`HttpGateway`], so the pipeline can be
//! driven by an in-memory gateway in tests.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::FetcherConfig;

/// Create a configured asynchronous HTTP client.
///
/// Timeouts are applied per call, not on the client.
pub fn create_async_client(config: &FetcherConfig) -> Result<Client> {
    let client = Client::builder().user_agent(&config.user_agent).build()?;
    Ok(client)
}

/// Outbound HTTP operations used by the archiver.
///
/// Implementations must treat any non-2xx status as an error.
#[async_trait]
pub trait HttpGateway: Send + Sync {
    /// GET `url` and decode the body as JSON.
    async fn get_json(&self, url: &str, timeout: Duration) -> Result<Value>;

    /// GET `url` and stream the body into `dest`, returning the byte count.
    async fn download_to(&self, url: &str, dest: &Path, timeout: Duration) -> Result<u64>;

    /// POST `body` as JSON to `url` and decode the JSON response.
    async fn post_json(&self, url: &str, body: &Value, timeout: Duration) -> Result<Value>;
}

/// [`HttpGateway`] backed by a shared `reqwest` client.
#[derive(Clone)]
pub struct ReqwestGateway {
    client: Client,
}

impl ReqwestGateway {
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
        })
    }

    /// Send the request and reject non-success statuses.
    async fn send_checked(request: RequestBuilder, url: &str) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::status(url, status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl HttpGateway for ReqwestGateway {
    async fn get_json(&self, url: &str, timeout: Duration) -> Result<Value> {
        let request = self.client.get(url).timeout(timeout);
        let bytes = Self::send_checked(request, url).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// `timeout` bounds the wait for the response head and for each body
    /// chunk, not the whole transfer, so a slow but live download completes.
    async fn download_to(&self, url: &str, dest: &Path, timeout: Duration) -> Result<u64> {
        let request = self.client.get(url);
        let mut response = tokio::time::timeout(timeout, Self::send_checked(request, url))
            .await
            .map_err(|_| AppError::timeout(url, timeout))??;

        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        loop {
            let chunk = tokio::time::timeout(timeout, response.chunk())
                .await
                .map_err(|_| AppError::timeout(url, timeout))??;
            let Some(chunk) = chunk else { break };
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }

    async fn post_json(&self, url: &str, body: &Value, timeout: Duration) -> Result<Value> {
        let request = self
            .client
            .post(url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/json;charset=utf-8",
            )
            .json(body)
            .timeout(timeout);
        let bytes = Self::send_checked(request, url).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}


/// In-memory gateway that serves canned responses and records every call.
#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::Value;

    use super::HttpGateway;
    use crate::error::{AppError, Result};

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Get(String),
        Download(String, PathBuf),
        Post(String, Value),
    }

    #[derive(Default)]
    pub struct MockGateway {
        json: HashMap<String, Value>,
        images: HashMap<String, Vec<u8>>,
        post_response: Option<Value>,
        calls: Mutex<Vec<Call>>,
    }

    impl MockGateway {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_json(mut self, url: &str, body: Value) -> Self {
            self.json.insert(url.to_string(), body);
            self
        }

        pub fn with_image(mut self, url: &str, bytes: &[u8]) -> Self {
            self.images.insert(url.to_string(), bytes.to_vec());
            self
        }

        pub fn with_post_response(mut self, body: Value) -> Self {
            self.post_response = Some(body);
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn gets(&self) -> usize {
            self.count(|c| matches!(c, Call::Get(_)))
        }

        pub fn downloads(&self) -> usize {
            self.count(|c| matches!(c, Call::Download(..)))
        }

        pub fn posts(&self) -> Vec<Value> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    Call::Post(_, body) => Some(body),
                    _ => None,
                })
                .collect()
        }

        fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl HttpGateway for MockGateway {
        async fn get_json(&self, url: &str, _timeout: Duration) -> Result<Value> {
            self.record(Call::Get(url.to_string()));
            self.json
                .get(url)
                .cloned()
                .ok_or_else(|| AppError::status(url, 404))
        }

        async fn download_to(&self, url: &str, dest: &Path, _timeout: Duration) -> Result<u64> {
            self.record(Call::Download(url.to_string(), dest.to_path_buf()));
            let bytes = self
                .images
                .get(url)
                .ok_or_else(|| AppError::status(url, 404))?;
            tokio::fs::write(dest, bytes).await?;
            Ok(bytes.len() as u64)
        }

        async fn post_json(&self, url: &str, body: &Value, _timeout: Duration) -> Result<Value> {
            self.record(Call::Post(url.to_string(), body.clone()));
            self.post_response
                .clone()
                .ok_or_else(|| AppError::status(url, 500))
        }
    }
}
