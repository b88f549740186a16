//! HTTP client implementation

use async_trait::async_trait;
use hnsearch_core::SearchPage;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Source of search result pages
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Fetch one zero-based page of results for `query`
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage>;
}

/// Client for the news search HTTP API
pub struct HnSearchClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HnSearchClient {
    /// Build a client for the given configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        debug!("Search client targeting {}", config.base_url);

        Ok(Self { client, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl SearchApi for HnSearchClient {
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage> {
        let url = self.config.search_url(query, page)?;

        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Search request failed with status {}: {}", status, body);
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let result: SearchPage = serde_json::from_slice(&bytes)?;

        debug!(
            "Received {} hits for {:?} (page {})",
            result.hits.len(),
            query,
            result.page
        );

        Ok(result)
    }
}
