//! Client-side copy of the graph listing, and the poller that keeps it fresh.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

use crate::client::{Backend, ClientError};
use crate::model::{GraphListing, GraphStatus};

/// Read-through cache of `/metadata/graphs`, newest graph first.
#[derive(Debug, Clone, Default)]
pub struct GraphCatalog {
    graphs: Vec<GraphListing>,
    fetched_at: Option<DateTime<Utc>>,
}

impl GraphCatalog {
    pub fn new(graphs: Vec<GraphListing>) -> Self {
        let mut catalog = Self::default();
        catalog.replace(graphs);
        catalog
    }

    pub fn graphs(&self) -> &[GraphListing] {
        &self.graphs
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// When the listing was last replaced.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Re-fetches the listing from the backend.
    pub async fn refresh<B: Backend>(&mut self, backend: &B) -> Result<Vec<String>, ClientError> {
        let graphs = backend.list_graphs().await?;
        Ok(self.replace(graphs))
    }

    /// Replaces the listing and returns the names of graphs that finished
    /// building since the previous listing.
    pub fn replace(&mut self, mut graphs: Vec<GraphListing>) -> Vec<String> {
        graphs.sort_by(|a, b| b.created.cmp(&a.created));
        let ready = became_ready(&self.graphs, &graphs);
        self.graphs = graphs;
        self.fetched_at = Some(Utc::now());
        ready
    }

    /// Looks a graph up by id, name or route name.
    pub fn get(&self, key: &str) -> Option<&GraphListing> {
        self.graphs.iter().find(|g| g.matches(key))
    }

    pub fn require(&self, key: &str) -> Result<&GraphListing, ClientError> {
        self.get(key)
            .ok_or_else(|| ClientError::GraphNotFound(key.to_string()))
    }

    /// Like [`GraphCatalog::require`], but also rejects graphs still building.
    pub fn ensure_ready(&self, key: &str) -> Result<&GraphListing, ClientError> {
        let graph = self.require(key)?;
        if !graph.status.is_ready() {
            return Err(ClientError::GraphNotReady(graph.name.clone()));
        }
        Ok(graph)
    }

    /// Drops exactly the graph with this id.
    pub fn remove(&mut self, id: &str) -> Option<GraphListing> {
        let index = self.graphs.iter().position(|g| g.id == id)?;
        Some(self.graphs.remove(index))
    }
}

/// Names of graphs that were `Pending` in `previous` and are `Created` in `current`.
pub fn became_ready(previous: &[GraphListing], current: &[GraphListing]) -> Vec<String> {
    let before: HashMap<&str, GraphStatus> = previous
        .iter()
        .map(|g| (g.id.as_str(), g.status))
        .collect();

    current
        .iter()
        .filter(|g| g.status.is_ready())
        .filter(|g| before.get(g.id.as_str()) == Some(&GraphStatus::Pending))
        .map(|g| g.name.clone())
        .collect()
}

/// One successful poll.
#[derive(Debug, Clone)]
pub struct ListingUpdate {
    pub graphs: Vec<GraphListing>,
    /// Graphs that moved from PENDING to CREATED since the previous poll.
    pub became_ready: Vec<String>,
}

/// Polls the graph listing on a fixed interval.
///
/// Each successful poll is sent on the channel; failed polls are logged and
/// skipped. The loop ends when the receiver is dropped.
pub struct ListingPoller<B: Backend> {
    backend: B,
    interval: Duration,
}

impl<B: Backend + 'static> ListingPoller<B> {
    pub fn new(backend: B, interval: Duration) -> Self {
        Self { backend, interval }
    }

    /// Run the poll loop on the tokio runtime.
    pub fn spawn(self, tx: mpsc::UnboundedSender<ListingUpdate>) -> JoinHandle<()> {
        tokio::spawn(self.run(tx))
    }

    pub async fn run(self, tx: mpsc::UnboundedSender<ListingUpdate>) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut ticks = IntervalStream::new(interval);
        let mut previous: Vec<GraphListing> = Vec::new();

        while ticks.next().await.is_some() {
            if tx.is_closed() {
                break;
            }

            match self.backend.list_graphs().await {
                Ok(graphs) => {
                    let ready = became_ready(&previous, &graphs);
                    for name in &ready {
                        info!(graph = %name, "graph finished building");
                    }
                    debug!(count = graphs.len(), "polled graph listing");
                    previous = graphs.clone();

                    let update = ListingUpdate {
                        graphs,
                        became_ready: ready,
                    };
                    if tx.send(update).is_err() {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "graph listing poll failed"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn listing(id: &str, day: u32, status: GraphStatus) -> GraphListing {
        GraphListing {
            id: id.to_string(),
            name: format!("graph-{}", id),
            description: String::new(),
            created: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            status,
            neo4j_name: None,
        }
    }

    #[test]
    fn test_sorted_newest_first() {
        let catalog = GraphCatalog::new(vec![
            listing("a", 1, GraphStatus::Created),
            listing("b", 3, GraphStatus::Created),
            listing("c", 2, GraphStatus::Created),
        ]);
        let ids: Vec<_> = catalog.graphs().iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_replace_reports_finished_graphs() {
        let mut catalog = GraphCatalog::new(vec![
            listing("a", 1, GraphStatus::Pending),
            listing("b", 2, GraphStatus::Pending),
        ]);
        let ready = catalog.replace(vec![
            listing("a", 1, GraphStatus::Created),
            listing("b", 2, GraphStatus::Pending),
            listing("c", 3, GraphStatus::Created),
        ]);
        assert_eq!(ready, vec!["graph-a".to_string()]);
    }

    #[test]
    fn test_ensure_ready() {
        let catalog = GraphCatalog::new(vec![
            listing("a", 1, GraphStatus::Pending),
            listing("b", 2, GraphStatus::Created),
        ]);
        assert!(matches!(
            catalog.ensure_ready("graph-a"),
            Err(ClientError::GraphNotReady(_))
        ));
        assert!(matches!(
            catalog.ensure_ready("nope"),
            Err(ClientError::GraphNotFound(_))
        ));
        assert_eq!(catalog.ensure_ready("b").unwrap().name, "graph-b");
    }

    #[test]
    fn test_remove_drops_exactly_one() {
        let mut catalog = GraphCatalog::new(vec![
            listing("a", 1, GraphStatus::Created),
            listing("b", 2, GraphStatus::Created),
        ]);
        assert_eq!(catalog.remove("a").unwrap().id, "a");
        assert_eq!(catalog.len(), 1);
        assert!(catalog.remove("a").is_none());
        assert_eq!(catalog.len(), 1);
    }
}
