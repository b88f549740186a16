//! hnsearch Store - Per-query result cache for a search session
//!
//! This crate provides:
//! - `QueryResultStore`: session state, the result cache and its mutations
//! - `FetchDispatcher`: the seam through which the store issues page fetches
//! - `FetchTicket`: a dispatched request, bound to the session that issued it

pub mod dispatch;
pub mod error;
pub mod store;

pub use dispatch::*;
pub use error::*;
pub use store::*;
