//! Fetch dispatch - how the store hands network work to whoever performs it

use tokio_util::sync::CancellationToken;

/// A page fetch issued by a store
///
/// The ticket carries the session token of the store that issued it; once
/// that session is torn down, the outcome of the fetch must not be applied.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    /// Query key the hits will be merged into
    pub key: String,

    /// Zero-based page index requested
    pub page: u32,

    session: CancellationToken,
}

impl FetchTicket {
    pub(crate) fn new(key: impl Into<String>, page: u32, session: CancellationToken) -> Self {
        Self {
            key: key.into(),
            page,
            session,
        }
    }

    /// Whether the issuing session has been torn down
    pub fn is_stale(&self) -> bool {
        self.session.is_cancelled()
    }
}

/// Performs fetches on behalf of a store
///
/// Dispatch must not block; the outcome is delivered back later through
/// `QueryResultStore::complete`.
pub trait FetchDispatcher {
    fn dispatch(&self, ticket: FetchTicket);
}

impl<F> FetchDispatcher for F
where
    F: Fn(FetchTicket),
{
    fn dispatch(&self, ticket: FetchTicket) {
        self(ticket)
    }
}
