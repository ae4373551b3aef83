use thiserror::Error;
use tracing::warn;

use super::{QueryDescriptor, QueryExecutor, ResultPage};
use crate::client::{Backend, ClientError};
use crate::model::GraphListing;
use crate::pagination::Pagination;

/// Errors raised when starting or completing a search.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please enter a query")]
    EmptyQuery,

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Sequence number attached to an issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing tickets; only the newest one is current.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
}

impl RequestSequencer {
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}

/// A query ready to send. Cheap to clone into a spawned task.
#[derive(Debug, Clone)]
pub struct PendingQuery {
    pub ticket: Ticket,
    pub graph: GraphListing,
    pub descriptor: QueryDescriptor,
    pub repository: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

impl PendingQuery {
    pub async fn run<B: Backend>(&self, backend: B) -> Result<ResultPage, ClientError> {
        QueryExecutor::new(backend)
            .execute(
                &self.graph,
                &self.descriptor,
                self.repository.as_deref(),
                self.limit,
                self.offset,
            )
            .await
    }
}

/// Outcome of handing a response back to the session.
#[derive(Debug, PartialEq, Eq)]
pub enum Accepted {
    /// The page is now displayed.
    Displayed,
    /// A newer request was issued; the response was dropped.
    Stale,
}

/// State of one search view.
///
/// The descriptor and repository filter are fixed by [`SearchSession::submit`];
/// paging re-runs the same query with a new offset. Responses are matched
/// against the newest ticket so a slow reply for an old offset never
/// overwrites a newer page.
#[derive(Debug)]
pub struct SearchSession {
    graph: GraphListing,
    descriptor: Option<QueryDescriptor>,
    repository: Option<String>,
    pagination: Pagination,
    sequencer: RequestSequencer,
    page: Option<ResultPage>,
    shown_offset: usize,
}

impl SearchSession {
    pub fn new(graph: GraphListing, limit: usize) -> Self {
        Self {
            graph,
            descriptor: None,
            repository: None,
            pagination: Pagination::new(limit),
            sequencer: RequestSequencer::default(),
            page: None,
            shown_offset: 0,
        }
    }

    pub fn graph(&self) -> &GraphListing {
        &self.graph
    }

    pub fn descriptor(&self) -> Option<&QueryDescriptor> {
        self.descriptor.as_ref()
    }

    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// The page currently on display, if any.
    pub fn page(&self) -> Option<&ResultPage> {
        self.page.as_ref()
    }

    /// Starts a new search from the first page.
    ///
    /// The session keeps showing the previous query until the response for
    /// this one is accepted.
    pub fn submit(
        &mut self,
        descriptor: QueryDescriptor,
        repository: Option<String>,
    ) -> Result<PendingQuery, SessionError> {
        if let QueryDescriptor::Semantic(text) = &descriptor {
            if text.trim().is_empty() {
                return Err(SessionError::EmptyQuery);
            }
        }
        if !self.graph.status.is_ready() {
            return Err(ClientError::GraphNotReady(self.graph.name.clone()).into());
        }

        Ok(self.pending(descriptor, repository, 0))
    }

    /// Moves to the next page; `None` when disabled or nothing was searched.
    pub fn next_page(&mut self) -> Option<PendingQuery> {
        let descriptor = self.descriptor.clone()?;
        if self.page.is_none() || !self.pagination.next() {
            return None;
        }
        Some(self.pending(descriptor, self.repository.clone(), self.pagination.offset()))
    }

    /// Moves to the previous page; `None` when already on the first.
    pub fn previous_page(&mut self) -> Option<PendingQuery> {
        let descriptor = self.descriptor.clone()?;
        if self.page.is_none() || !self.pagination.previous() {
            return None;
        }
        Some(self.pending(descriptor, self.repository.clone(), self.pagination.offset()))
    }

    fn pending(
        &mut self,
        descriptor: QueryDescriptor,
        repository: Option<String>,
        offset: usize,
    ) -> PendingQuery {
        PendingQuery {
            ticket: self.sequencer.issue(),
            graph: self.graph.clone(),
            descriptor,
            repository,
            limit: self.pagination.limit(),
            offset,
        }
    }

    /// Hands a response back to the session.
    ///
    /// A successful latest response commits its descriptor, filter and
    /// offset. A failed one leaves the previous page, query and offset on
    /// screen; the error is returned for display.
    pub fn accept(
        &mut self,
        pending: &PendingQuery,
        result: Result<ResultPage, ClientError>,
    ) -> Result<Accepted, ClientError> {
        if !self.sequencer.is_latest(pending.ticket) {
            warn!(
                ticket = pending.ticket.value(),
                offset = pending.offset,
                "dropping stale search response"
            );
            return Ok(Accepted::Stale);
        }

        match result {
            Ok(page) => {
                self.descriptor = Some(pending.descriptor.clone());
                self.repository = pending.repository.clone();
                self.pagination.rewind_to(pending.offset);
                self.pagination.set_total(page.total());
                self.shown_offset = pending.offset;
                self.page = Some(page);
                Ok(Accepted::Displayed)
            }
            Err(err) => {
                self.pagination.rewind_to(self.shown_offset);
                Err(err)
            }
        }
    }

    /// Submit, run and accept in one step (for non-interactive callers).
    pub async fn execute<B: Backend>(
        &mut self,
        backend: B,
        descriptor: QueryDescriptor,
        repository: Option<String>,
        offset: usize,
    ) -> Result<&ResultPage, SessionError> {
        let mut pending = self.submit(descriptor, repository)?;
        let limit = self.pagination.limit();
        pending.offset = offset - offset % limit;

        let result = pending.run(backend).await;
        self.accept(&pending, result)?;
        self.page
            .as_ref()
            .ok_or_else(|| SessionError::Client(ClientError::Parse("empty page".to_string())))
    }
}
