//! Outbound page fetching.

use async_trait::async_trait;
use reqwest::redirect::Policy;
use tracing::debug;

use crate::config::FetchConfig;
use crate::error::{SieveError, SieveResult};

/// Retrieves the raw content behind a URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> SieveResult<String>;
}

/// `PageFetcher` backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the configured timeout, redirect cap and user agent.
    pub fn new(config: &FetchConfig) -> SieveResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .redirect(Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> SieveResult<String> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SieveError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        debug!(url, bytes = body.len(), "Fetched page");

        Ok(body)
    }
}
