//! Error types for hnsearch-store

use thiserror::Error;

/// Failure of a page fetch, as surfaced to the presentation layer
///
/// Transport failures and non-success responses are not distinguished.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Fetch failed: {reason}")]
    FetchFailed { reason: String },
}

impl FetchError {
    pub fn failed(reason: impl Into<String>) -> Self {
        FetchError::FetchFailed {
            reason: reason.into(),
        }
    }
}
