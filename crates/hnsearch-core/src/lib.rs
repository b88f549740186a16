//! hnsearch Core - Core types shared by the search client, store and CLI
//!
//! This crate defines the fundamental data structures used throughout hnsearch:
//! - `SearchHit`: One result record returned by the search API
//! - `PageResult`: The cached hits accumulated for one query key
//! - `SearchPage`: One decoded page of results
//! - `SortKey` / `SortState`: Client-side ordering of the displayed hits

pub mod error;
pub mod hit;
pub mod sort;

pub use error::*;
pub use hit::*;
pub use sort::*;
