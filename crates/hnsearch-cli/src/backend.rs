//! Background thread for search requests
//!
//! The session loop is synchronous and owns the store. We:
//! 1. Spawn a background thread with a tokio runtime
//! 2. Use channels to carry fetch tickets in and completions out
//! 3. Let the session wait on completions with a bounded timeout

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use hnsearch_client::SearchApi;
use hnsearch_core::SearchPage;
use hnsearch_store::{FetchDispatcher, FetchError, FetchTicket};
use tokio::runtime::Runtime;
use tracing::{debug, error};

/// Commands sent from the session to the backend
#[derive(Debug)]
pub enum BackendCommand {
    Fetch { ticket: FetchTicket },
}

/// Events sent from the backend to the session
#[derive(Debug, Clone)]
pub enum BackendEvent {
    PageFetched { ticket: FetchTicket, page: SearchPage },
    FetchFailed { ticket: FetchTicket, error: FetchError },
}

impl BackendEvent {
    /// Split into the ticket and the outcome the store applies
    pub fn into_outcome(self) -> (FetchTicket, Result<SearchPage, FetchError>) {
        match self {
            BackendEvent::PageFetched { ticket, page } => (ticket, Ok(page)),
            BackendEvent::FetchFailed { ticket, error } => (ticket, Err(error)),
        }
    }
}

/// Handle to communicate with the backend
pub struct BackendHandle {
    cmd_tx: Sender<BackendCommand>,
    event_tx: Sender<BackendEvent>,
    event_rx: Receiver<BackendEvent>,
}

impl BackendHandle {
    /// Spawn the backend thread and return a handle
    pub fn spawn(api: Arc<dyn SearchApi>) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(100);
        let (event_tx, event_rx) = bounded::<BackendEvent>(100);

        let rt = Runtime::new()?;
        let loop_tx = event_tx.clone();

        thread::Builder::new()
            .name("hnsearch-backend".into())
            .spawn(move || backend_loop(rt, api, cmd_rx, loop_tx))?;

        Ok(Self {
            cmd_tx,
            event_tx,
            event_rx,
        })
    }

    /// Dispatcher handing the store's fetches to this backend
    pub fn dispatcher(&self) -> BackendDispatcher {
        BackendDispatcher {
            cmd_tx: self.cmd_tx.clone(),
            event_tx: self.event_tx.clone(),
        }
    }

    /// Try to receive an event (non-blocking)
    pub fn try_recv(&self) -> Option<BackendEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Wait up to `timeout` for the next event
    ///
    /// Returns `None` on timeout or when the backend has gone away.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<BackendEvent> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                error!("Backend event channel closed");
                None
            }
        }
    }
}

/// Sending half of the backend, owned by the store
#[derive(Clone)]
pub struct BackendDispatcher {
    cmd_tx: Sender<BackendCommand>,
    event_tx: Sender<BackendEvent>,
}

impl FetchDispatcher for BackendDispatcher {
    fn dispatch(&self, ticket: FetchTicket) {
        if let Err(e) = self.cmd_tx.try_send(BackendCommand::Fetch { ticket }) {
            error!("Backend unavailable: {}", e);
            let BackendCommand::Fetch { ticket } = e.into_inner();
            // report it as a failed fetch so the session does not stay loading
            let event = BackendEvent::FetchFailed {
                ticket,
                error: FetchError::failed("search backend unavailable"),
            };
            if let Err(e) = self.event_tx.try_send(event) {
                error!("Dropped failure report, event queue unavailable: {}", e);
            }
        }
    }
}

fn backend_loop(
    rt: Runtime,
    api: Arc<dyn SearchApi>,
    cmd_rx: Receiver<BackendCommand>,
    event_tx: Sender<BackendEvent>,
) {
    // Exits once every sender (handle and dispatchers) is dropped
    while let Ok(cmd) = cmd_rx.recv() {
        let event = rt.block_on(process_command(api.as_ref(), cmd));

        if event_tx.send(event).is_err() {
            break;
        }
    }

    debug!("Backend loop exited");
}

async fn process_command(api: &dyn SearchApi, cmd: BackendCommand) -> BackendEvent {
    match cmd {
        BackendCommand::Fetch { ticket } => {
            let result = api.search(&ticket.key, ticket.page).await;
            match result {
                Ok(page) => BackendEvent::PageFetched { ticket, page },
                Err(e) => BackendEvent::FetchFailed {
                    ticket,
                    error: FetchError::failed(e.to_string()),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use hnsearch_store::QueryResultStore;

    use super::*;

    #[test]
    fn test_unreachable_backend_reports_failure() {
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(1);
        let (event_tx, event_rx) = bounded::<BackendEvent>(1);
        drop(cmd_rx);

        let dispatcher = BackendDispatcher { cmd_tx, event_tx };
        let mut store = QueryResultStore::new("redux", dispatcher);
        assert!(store.submit());

        let event = event_rx.try_recv().unwrap();
        let (ticket, outcome) = event.into_outcome();
        assert_eq!(ticket.key, "redux");
        assert!(outcome.is_err());
    }

    #[test]
    fn test_full_event_queue_does_not_block_dispatch() {
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(1);
        let (event_tx, event_rx) = bounded::<BackendEvent>(1);
        drop(cmd_rx);

        let dispatcher = BackendDispatcher { cmd_tx, event_tx };
        let mut store = QueryResultStore::new("redux", dispatcher);
        assert!(store.submit());
        store.set_active_query("react");
        assert!(store.submit());

        // only the first failure fits; the second is logged and dropped
        assert_eq!(event_rx.len(), 1);
        let (ticket, _) = event_rx.try_recv().unwrap().into_outcome();
        assert_eq!(ticket.key, "redux");
        assert!(event_rx.try_recv().is_err());
    }
}
