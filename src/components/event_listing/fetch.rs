use crate::error::{fetch_error, other_error, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Source of raw HTML pages
///
/// Implementations must report transport and HTTP failures as errors. An
/// empty body is a valid page, not a failure.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch the page at `url` and return its body
    async fn fetch(&self, url: &str) -> AppResult<String>;
}

/// Fetches pages over HTTP
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| other_error(&format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> AppResult<String> {
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(url, &e.to_string()))?;

        if !response.status().is_success() {
            return Err(fetch_error(url, &format!("HTTP {}", response.status())));
        }

        // reqwest decodes the body using the charset from Content-Type
        response
            .text()
            .await
            .map_err(|e| fetch_error(url, &format!("Failed to read body: {}", e)))
    }
}
