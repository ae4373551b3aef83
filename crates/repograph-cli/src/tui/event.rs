//! Event handling for the TUI.

use crossterm::event::{KeyEvent, KeyEventKind};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;

use repograph_core::model::AvailableQuery;
use repograph_core::query::PendingQuery;
use repograph_core::{
    ClientError, Deleted, GraphListing, GraphSummary, IssueReport, LifecycleError,
    ListingUpdate, ResultPage, Route,
};

use super::app::SearchTab;

/// Events that can occur in the application.
///
/// Results of background requests carry the graph (or ticket) they were
/// issued for, so a reply for a screen that is no longer shown is dropped.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed
    Key(KeyEvent),
    /// A tick occurred (for the loading indicator)
    Tick,
    /// The listing poller produced a fresh listing
    Listing(ListingUpdate),
    /// A listing requested by the user arrived
    GraphsLoaded(Result<Vec<GraphListing>, ClientError>),
    /// Summary of a graph arrived
    SummaryLoaded {
        graph: String,
        result: Result<GraphSummary, ClientError>,
    },
    /// Predefined queries and repository names of a graph arrived
    SearchOptionsLoaded {
        graph: String,
        result: Result<(Vec<AvailableQuery>, Vec<String>), ClientError>,
    },
    /// A search page arrived
    SearchLoaded {
        tab: SearchTab,
        pending: PendingQuery,
        result: Result<ResultPage, ClientError>,
    },
    /// All issue datasets of a graph arrived
    IssuesLoaded {
        graph: String,
        result: Result<IssueReport, ClientError>,
    },
    /// A graph build was submitted
    GraphCreated(Result<Route, LifecycleError>),
    /// The backend answered a confirmed delete
    GraphDeleted(Result<Deleted, LifecycleError>),
}

/// Handles events from various sources.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    /// Create a new event handler.
    pub fn new() -> Self {
        let tick_rate = Duration::from_millis(100);
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut interval = tokio::time::interval(tick_rate);

            loop {
                let crossterm_event = reader.next().fuse();
                let tick = interval.tick();

                tokio::select! {
                    maybe_event = crossterm_event => {
                        match maybe_event {
                            Some(Ok(crossterm::event::Event::Key(key))) => {
                                // Only key presses, not releases
                                if key.kind == KeyEventKind::Press
                                    && event_tx.send(Event::Key(key)).is_err()
                                {
                                    break;
                                }
                            }
                            Some(Ok(_)) | Some(Err(_)) => {}
                            None => break,
                        }
                    }
                    _ = tick => {
                        if event_tx.send(Event::Tick).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self { rx, tx }
    }

    /// Get the next event.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    /// Sender for results of background requests.
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
