//! Interactive search session - forwards user commands to the store

use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use hnsearch_core::{SortKey, SortState};
use hnsearch_store::QueryResultStore;
use tracing::{debug, warn};

use crate::backend::{BackendDispatcher, BackendEvent, BackendHandle};
use crate::view::{self, Frame};

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Edit the query box without submitting
    Type(String),
    Submit,
    /// Edit and submit in one go
    Search(String),
    More,
    Dismiss(String),
    Sort(SortKey),
    Show,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "type" => Command::Type(rest.to_string()),
            "submit" => Command::Submit,
            "search" | "s" => Command::Search(rest.to_string()),
            "more" | "m" => Command::More,
            "dismiss" | "d" => {
                if rest.is_empty() {
                    bail!("Usage: dismiss <id>");
                }
                Command::Dismiss(rest.to_string())
            }
            "sort" => Command::Sort(rest.parse()?),
            "show" | "" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => bail!("Unknown command: {}", other),
        };

        Ok(command)
    }
}

/// Whether the session loop should keep reading input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Store, backend and table state of one running session
pub struct Session {
    store: QueryResultStore<BackendDispatcher>,
    backend: BackendHandle,
    sort: SortState,
    wait_limit: Duration,
    /// Fetches dispatched whose completion has not been applied yet
    outstanding: usize,
}

impl Session {
    /// Start a session; nothing is fetched until the first submit
    pub fn new(default_query: impl Into<String>, backend: BackendHandle) -> Self {
        let store = QueryResultStore::new(default_query, backend.dispatcher());
        Self {
            store,
            backend,
            sort: SortState::default(),
            wait_limit: Duration::from_secs(120),
            outstanding: 0,
        }
    }

    /// Upper bound on how long `wait` blocks for outstanding fetches
    pub fn with_wait_limit(mut self, wait_limit: Duration) -> Self {
        self.wait_limit = wait_limit;
        self
    }

    pub fn store(&self) -> &QueryResultStore<BackendDispatcher> {
        &self.store
    }

    /// Apply one user command, waiting for any fetch it starts
    pub fn handle(&mut self, command: Command) -> Result<Flow> {
        debug!("Handling {:?}", command);

        match command {
            Command::Type(term) => self.store.set_active_query(term),
            Command::Submit => {
                if self.store.submit() {
                    self.outstanding += 1;
                    self.wait()?;
                }
            }
            Command::Search(term) => {
                self.store.set_active_query(term);
                if self.store.submit() {
                    self.outstanding += 1;
                    self.wait()?;
                }
            }
            Command::More => {
                if self.store.is_loading() {
                    debug!("Load more ignored while loading");
                } else if self.store.load_more() {
                    self.outstanding += 1;
                    self.wait()?;
                }
            }
            Command::Dismiss(id) => {
                if !self.store.dismiss(&id) {
                    warn!("No result with id {:?}", id);
                }
            }
            Command::Sort(key) => self.sort.select(key),
            Command::Show | Command::Help => {}
            Command::Quit => {
                self.teardown();
                return Ok(Flow::Exit);
            }
        }

        Ok(Flow::Continue)
    }

    /// Block until every dispatched fetch has completed, applying completions
    /// in arrival order
    ///
    /// Fetches left over from an earlier timed-out wait are waited for too.
    pub fn wait(&mut self) -> Result<()> {
        let deadline = Instant::now() + self.wait_limit;

        while self.outstanding > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let event = self
                .backend
                .recv_timeout(remaining)
                .context("timed out waiting for search results")?;
            self.apply(event);
        }

        Ok(())
    }

    fn apply(&mut self, event: BackendEvent) {
        self.outstanding = self.outstanding.saturating_sub(1);
        let (ticket, outcome) = event.into_outcome();
        self.store.complete(ticket, outcome);
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            active_query: self.store.active_query(),
            hits: self.store.hits(),
            page: self.store.page(),
            loading: self.store.is_loading(),
            error: self.store.error(),
            sort: self.sort,
        }
    }

    pub fn render(&self, width: usize) -> String {
        view::render(&self.frame(), width)
    }

    pub fn teardown(&mut self) {
        self.store.teardown();
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Fetch `pages` pages of `query` and leave them sorted for rendering
pub fn run_once(session: &mut Session, query: &str, pages: u32, sort: Option<(SortKey, bool)>) -> Result<()> {
    session.handle(Command::Search(query.to_string()))?;

    for _ in 1..pages {
        if session.store().error().is_some() {
            break;
        }
        session.handle(Command::More)?;
    }

    if let Some((key, reverse)) = sort {
        session.handle(Command::Sort(key))?;
        if reverse {
            session.handle(Command::Sort(key))?;
        }
    }

    if session.store().error().is_some() {
        bail!("search for {:?} failed", query);
    }

    Ok(())
}
