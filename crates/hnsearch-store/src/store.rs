//! Query result store - the per-query cache behind a search session

use std::collections::HashMap;

use hnsearch_core::{PageResult, SearchHit, SearchPage};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::dispatch::{FetchDispatcher, FetchTicket};
use crate::error::FetchError;

/// Query key -> everything fetched for it this session
pub type ResultCache = HashMap<String, PageResult>;

/// Default query issued when a session starts
pub const DEFAULT_QUERY: &str = "redux";

/// State of one search session
///
/// `active_query` follows every edit of the query box, `committed_key` only
/// changes on submit and selects which cached results are displayed. Fetches
/// go out through the dispatcher and come back through [`complete`].
///
/// [`complete`]: QueryResultStore::complete
pub struct QueryResultStore<D> {
    cache: ResultCache,
    committed_key: String,
    active_query: String,
    loading: bool,
    error: Option<FetchError>,
    session: CancellationToken,
    dispatcher: D,
}

impl<D: FetchDispatcher> QueryResultStore<D> {
    /// Start a session with `default_query` in the query box
    pub fn new(default_query: impl Into<String>, dispatcher: D) -> Self {
        Self {
            cache: ResultCache::new(),
            committed_key: String::new(),
            active_query: default_query.into(),
            loading: false,
            error: None,
            session: CancellationToken::new(),
            dispatcher,
        }
    }

    /// Whether `key` has never been fetched this session
    pub fn needs_fetch(&self, key: &str) -> bool {
        !self.cache.contains_key(key)
    }

    /// Record an edit of the query box
    pub fn set_active_query(&mut self, term: impl Into<String>) {
        self.active_query = term.into();
    }

    /// Commit the active query, fetching its first page unless cached
    ///
    /// Returns `true` if a fetch was dispatched.
    pub fn submit(&mut self) -> bool {
        self.committed_key = self.active_query.clone();

        if self.needs_fetch(&self.committed_key) {
            let key = self.committed_key.clone();
            self.fetch_page(key, 0);
            true
        } else {
            debug!("Serving {:?} from cache", self.committed_key);
            false
        }
    }

    /// Dispatch a fetch of one page of `key`
    pub fn fetch_page(&mut self, key: impl Into<String>, page: u32) {
        let ticket = FetchTicket::new(key, page, self.session.clone());

        debug!("Fetching page {} of {:?}", ticket.page, ticket.key);

        self.error = None;
        self.loading = true;
        self.dispatcher.dispatch(ticket);
    }

    /// Fetch the page after the last one cached for the committed key
    ///
    /// Returns `false` without fetching if the committed key has no results yet.
    pub fn load_more(&mut self) -> bool {
        let Some(result) = self.cache.get(&self.committed_key) else {
            debug!("Nothing cached for {:?}, ignoring load more", self.committed_key);
            return false;
        };

        let next = result.page + 1;
        let key = self.committed_key.clone();
        self.fetch_page(key, next);
        true
    }

    /// Apply the outcome of a dispatched fetch
    ///
    /// Outcomes for a torn-down session are dropped without touching any
    /// state. Returns `true` if the outcome was applied.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<SearchPage, FetchError>,
    ) -> bool {
        if ticket.is_stale() {
            debug!(
                "Discarding page {} of {:?}: session torn down",
                ticket.page, ticket.key
            );
            return false;
        }

        match outcome {
            Ok(response) => {
                if response.page != ticket.page {
                    warn!(
                        "Requested page {} of {:?} but server reported page {}",
                        ticket.page, ticket.key, response.page
                    );
                }

                let count = response.hits.len();
                let entry = self.cache.entry(ticket.key).or_default();
                entry.merge(response.hits, ticket.page);

                debug!("Merged {} hits, {} cached", count, entry.len());
            }
            Err(error) => {
                warn!("Page {} of {:?} failed: {}", ticket.page, ticket.key, error);
                self.error = Some(error);
            }
        }

        self.loading = false;
        true
    }

    /// Remove one hit from the displayed results
    ///
    /// Returns `true` if a hit with that id was cached for the committed key.
    pub fn dismiss(&mut self, object_id: &str) -> bool {
        let removed = self
            .cache
            .get_mut(&self.committed_key)
            .and_then(|result| result.remove(object_id));

        if removed.is_some() {
            debug!("Dismissed {} from {:?}", object_id, self.committed_key);
        }

        removed.is_some()
    }

    /// End the session; later fetch outcomes are discarded
    pub fn teardown(&mut self) {
        if !self.session.is_cancelled() {
            info!("Search session torn down");
            self.session.cancel();
        }
    }

    // ========================================================================
    // State accessors
    // ========================================================================

    pub fn active_query(&self) -> &str {
        &self.active_query
    }

    pub fn committed_key(&self) -> &str {
        &self.committed_key
    }

    /// Hits currently displayed (those cached for the committed key)
    pub fn hits(&self) -> &[SearchHit] {
        self.cache
            .get(&self.committed_key)
            .map(|result| result.hits.as_slice())
            .unwrap_or_default()
    }

    /// Last page fetched for the committed key (0 if none)
    pub fn page(&self) -> u32 {
        self.cache
            .get(&self.committed_key)
            .map(|result| result.page)
            .unwrap_or(0)
    }

    pub fn result(&self, key: &str) -> Option<&PageResult> {
        self.cache.get(key)
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn is_torn_down(&self) -> bool {
        self.session.is_cancelled()
    }
}
