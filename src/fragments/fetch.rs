//! Fragment retrieval over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {0}")]
    Status(StatusCode),
    #[error("Invalid fragment URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Source of fragment markup. Production uses HTTP; tests substitute
/// scripted implementations.
#[async_trait]
pub trait FragmentFetcher: Send + Sync {
    /// Retrieve the markup behind `path`, relative to the fetcher's base.
    async fn fetch(&self, path: &str) -> Result<String, FetchError>;
}

/// HTTP fragment fetcher backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base: Url,
}

impl HttpFetcher {
    /// Create a fetcher resolving fragment paths against `base`.
    pub fn new(base: Url, timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;
        Ok(Self { client, base })
    }
}

#[async_trait]
impl FragmentFetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let url = self.base.join(path)?;
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        Ok(response.text().await?)
    }
}
