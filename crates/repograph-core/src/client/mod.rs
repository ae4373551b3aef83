mod error;
mod http;

pub use error::ClientError;
pub use http::BackendClient;

use std::sync::Arc;

use async_trait::async_trait;

use crate::issues::IssueCategory;
use crate::model::{
    AvailableQuery, CallGraph, GraphListing, GraphSummary, SearchResultSet, TabularResult,
};

/// A file to upload as part of a new graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name sent in the multipart part.
    pub file_name: String,
    /// Raw archive bytes.
    pub bytes: Vec<u8>,
}

/// Multipart payload for `POST /graph/build`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphUpload {
    pub name: String,
    pub description: String,
    pub files: Vec<UploadFile>,
}

/// Trait for the RepoGraph backend API.
///
/// Every method issues exactly one request; nothing is cached or retried.
/// The reqwest-backed [`BackendClient`] is the production implementation;
/// tests and the TUI can substitute their own.
///
/// # Example
///
/// ```ignore
/// use repograph_core::{Backend, BackendClient, Config};
///
/// let config = Config::load()?;
/// let backend = BackendClient::from_config(&config.backend)?;
///
/// for graph in backend.list_graphs().await? {
///     println!("{} ({})", graph.name, graph.status.display_name());
/// }
/// ```
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /metadata/graphs`
    async fn list_graphs(&self) -> Result<Vec<GraphListing>, ClientError>;

    /// `GET /graph/{name}/summary`
    async fn summary(&self, graph: &str) -> Result<GraphSummary, ClientError>;

    /// `POST /graph/build` with a multipart body.
    async fn build_graph(&self, upload: GraphUpload) -> Result<(), ClientError>;

    /// `DELETE /graph/{name}`.
    ///
    /// Returns the raw HTTP status for any response the server produced;
    /// only transport failures are errors. Callers decide what counts as
    /// success.
    async fn delete_graph(&self, graph: &str) -> Result<u16, ClientError>;

    /// `GET /graph/{name}/search/semantic?query&limit&offset`
    async fn semantic_search(
        &self,
        graph: &str,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<SearchResultSet, ClientError>;

    /// `GET /graph/{name}/search/query/{id}?repository&limit&offset`
    async fn named_query(
        &self,
        graph: &str,
        query_id: u32,
        repository: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<TabularResult, ClientError>;

    /// `GET /graph/{name}/search/query/available`
    async fn available_queries(&self, graph: &str) -> Result<Vec<AvailableQuery>, ClientError>;

    /// `GET /graph/{name}/repositories`
    async fn repositories(&self, graph: &str) -> Result<Vec<String>, ClientError>;

    /// `GET /graph/{name}/node/{id}/call_graph`
    async fn call_graph(&self, graph: &str, node_id: &str) -> Result<CallGraph, ClientError>;

    /// `GET /graph/{name}/{category-endpoint}`
    async fn issues(
        &self,
        graph: &str,
        category: IssueCategory,
    ) -> Result<TabularResult, ClientError>;
}

/// Blanket implementation for shared handles.
#[async_trait]
impl<B: Backend + ?Sized> Backend for Arc<B> {
    async fn list_graphs(&self) -> Result<Vec<GraphListing>, ClientError> {
        (**self).list_graphs().await
    }

    async fn summary(&self, graph: &str) -> Result<GraphSummary, ClientError> {
        (**self).summary(graph).await
    }

    async fn build_graph(&self, upload: GraphUpload) -> Result<(), ClientError> {
        (**self).build_graph(upload).await
    }

    async fn delete_graph(&self, graph: &str) -> Result<u16, ClientError> {
        (**self).delete_graph(graph).await
    }

    async fn semantic_search(
        &self,
        graph: &str,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<SearchResultSet, ClientError> {
        (**self).semantic_search(graph, query, limit, offset).await
    }

    async fn named_query(
        &self,
        graph: &str,
        query_id: u32,
        repository: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<TabularResult, ClientError> {
        (**self)
            .named_query(graph, query_id, repository, limit, offset)
            .await
    }

    async fn available_queries(&self, graph: &str) -> Result<Vec<AvailableQuery>, ClientError> {
        (**self).available_queries(graph).await
    }

    async fn repositories(&self, graph: &str) -> Result<Vec<String>, ClientError> {
        (**self).repositories(graph).await
    }

    async fn call_graph(&self, graph: &str, node_id: &str) -> Result<CallGraph, ClientError> {
        (**self).call_graph(graph, node_id).await
    }

    async fn issues(
        &self,
        graph: &str,
        category: IssueCategory,
    ) -> Result<TabularResult, ClientError> {
        (**self).issues(graph, category).await
    }
}
