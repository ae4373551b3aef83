//! Query execution against a graph: semantic search and named queries.
//!
//! - `executor` - issues one request per call and normalizes the response
//! - `session` - one search view's descriptor, filter, pagination and
//!   stale-response guard

mod executor;
mod session;

pub use executor::QueryExecutor;
pub use session::{Accepted, PendingQuery, RequestSequencer, SearchSession, SessionError, Ticket};

use serde::{Deserialize, Serialize};

use crate::model::{AvailableQuery, Row, SearchResult};

/// What to run: free text for semantic search, or a backend-defined query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryDescriptor {
    Semantic(String),
    Named(AvailableQuery),
}

impl QueryDescriptor {
    pub fn semantic(text: impl Into<String>) -> Self {
        QueryDescriptor::Semantic(text.into())
    }

    /// Text shown to the user for this descriptor.
    pub fn label(&self) -> &str {
        match self {
            QueryDescriptor::Semantic(text) => text,
            QueryDescriptor::Named(query) => &query.name,
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultPage {
    /// Rows under named columns (named queries, issue tables).
    Tabular {
        columns: Vec<String>,
        rows: Vec<Row>,
        total: usize,
    },
    /// Scored hits (semantic search).
    Scored {
        results: Vec<SearchResult>,
        total: usize,
    },
}

impl ResultPage {
    /// Count across all pages.
    pub fn total(&self) -> usize {
        match self {
            ResultPage::Tabular { total, .. } | ResultPage::Scored { total, .. } => *total,
        }
    }

    /// Number of entries on this page.
    pub fn len(&self) -> usize {
        match self {
            ResultPage::Tabular { rows, .. } => rows.len(),
            ResultPage::Scored { results, .. } => results.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
