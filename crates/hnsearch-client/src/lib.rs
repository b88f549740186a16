//! hnsearch Client - Client library for the paginated news search API
//!
//! This crate provides:
//! - `SearchApi`: the seam the session backend fetches pages through
//! - `HnSearchClient`: reqwest-backed implementation of `SearchApi`
//! - `ClientConfig`: endpoint, page size and timeout settings

pub mod client;
pub mod config;
pub mod error;

pub use client::*;
pub use config::*;
pub use error::*;
