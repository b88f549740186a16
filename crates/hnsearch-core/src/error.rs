//! Error types for hnsearch-core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
