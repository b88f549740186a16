//! Client configuration

use std::time::Duration;

use url::Url;

use crate::error::{ClientError, Result};

pub const DEFAULT_BASE_URL: &str = "https://hn.algolia.com/api/v1";
pub const DEFAULT_HITS_PER_PAGE: u32 = 10;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_BASE_URL: &str = "HNSEARCH_API_URL";
pub const ENV_HITS_PER_PAGE: &str = "HNSEARCH_HITS_PER_PAGE";
pub const ENV_TIMEOUT_SECS: &str = "HNSEARCH_TIMEOUT_SECS";

/// Configuration for the search client
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API root; `/search` is appended to it
    pub base_url: Url,

    /// Fixed page size sent as `hitsPerPage`
    pub hits_per_page: u32,

    /// Per-request timeout (None waits forever)
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            hits_per_page: DEFAULT_HITS_PER_PAGE,
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl ClientConfig {
    /// Build a config from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup, falling back to defaults
    ///
    /// A timeout of `0` seconds disables the timeout.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL) {
            config = config.with_base_url(&url)?;
        }

        if let Some(hpp) = lookup(ENV_HITS_PER_PAGE) {
            let hits_per_page = hpp.trim().parse::<u32>().map_err(|e| {
                ClientError::Config(format!("{}={:?}: {}", ENV_HITS_PER_PAGE, hpp, e))
            })?;
            config = config.with_hits_per_page(hits_per_page)?;
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            let secs = secs.trim().parse::<u64>().map_err(|e| {
                ClientError::Config(format!("{}={:?}: {}", ENV_TIMEOUT_SECS, secs, e))
            })?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        self.base_url = Url::parse(url)?;
        Ok(self)
    }

    pub fn with_hits_per_page(mut self, hits_per_page: u32) -> Result<Self> {
        if hits_per_page == 0 {
            return Err(ClientError::Config("hits per page must be at least 1".into()));
        }
        self.hits_per_page = hits_per_page;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL of the search endpoint for one page of `query`
    pub fn search_url(&self, query: &str, page: u32) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .push("search");
        url.query_pairs_mut()
            .clear()
            .append_pair("query", query)
            .append_pair("page", &page.to_string())
            .append_pair("hitsPerPage", &self.hits_per_page.to_string());
        Ok(url)
    }
}
