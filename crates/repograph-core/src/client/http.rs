use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{Backend, ClientError, GraphUpload};
use crate::config::BackendConfig;
use crate::issues::IssueCategory;
use crate::model::{
    AvailableQuery, CallGraph, GraphListing, GraphSummary, SearchResultSet, TabularResult,
};

/// HTTP client for `repograph-backend`.
///
/// All endpoint URLs are derived from a single origin, e.g.
/// `http://localhost:3000` in development or `http://repograph-backend:3000`
/// inside the compose network. Graph names and node ids are
/// percent-encoded as path segments.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base: Url,
    client: Client,
}

impl BackendClient {
    /// Creates a client for the given backend origin.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ClientError> {
        Self::with_client(base_url, Client::new())
    }

    /// Creates a client from backend configuration (origin and timeout).
    pub fn from_config(config: &BackendConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Self::with_client(&config.url, client)
    }

    fn with_client(base_url: impl AsRef<str>, client: Client) -> Result<Self, ClientError> {
        let raw = base_url.as_ref().trim();
        let base = Url::parse(raw).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", raw, e)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(raw.to_string()));
        }
        Ok(Self { base, client })
    }

    /// The configured origin without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Builds `{base}/{segments...}`.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        debug!(%url, ?query, "GET");
        let response = self.client.get(url).query(query).send().await?;
        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}

/// Maps non-2xx responses to `ClientError::Status`.
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

fn window_params(limit: usize, offset: usize) -> [(&'static str, String); 2] {
    [("limit", limit.to_string()), ("offset", offset.to_string())]
}

#[async_trait]
impl Backend for BackendClient {
    async fn list_graphs(&self) -> Result<Vec<GraphListing>, ClientError> {
        let url = self.endpoint(&["metadata", "graphs"])?;
        self.get_json(url, &[]).await
    }

    async fn summary(&self, graph: &str) -> Result<GraphSummary, ClientError> {
        let url = self.endpoint(&["graph", graph, "summary"])?;
        self.get_json(url, &[]).await
    }

    async fn build_graph(&self, upload: GraphUpload) -> Result<(), ClientError> {
        let url = self.endpoint(&["graph", "build"])?;

        let mut form = Form::new()
            .text("name", upload.name)
            .text("description", upload.description);
        for file in upload.files {
            form = form.part("files", Part::bytes(file.bytes).file_name(file.file_name));
        }

        debug!(%url, "POST multipart");
        let response = self.client.post(url).multipart(form).send().await?;
        check_status(response).await?;
        Ok(())
    }

    async fn delete_graph(&self, graph: &str) -> Result<u16, ClientError> {
        let url = self.endpoint(&["graph", graph])?;
        debug!(%url, "DELETE");
        let response = self.client.delete(url).send().await?;
        Ok(response.status().as_u16())
    }

    async fn semantic_search(
        &self,
        graph: &str,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<SearchResultSet, ClientError> {
        let url = self.endpoint(&["graph", graph, "search", "semantic"])?;
        let [limit, offset] = window_params(limit, offset);
        self.get_json(url, &[("query", query.to_string()), limit, offset])
            .await
    }

    async fn named_query(
        &self,
        graph: &str,
        query_id: u32,
        repository: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<TabularResult, ClientError> {
        let id = query_id.to_string();
        let url = self.endpoint(&["graph", graph, "search", "query", &id])?;

        let mut params = Vec::with_capacity(3);
        if let Some(repository) = repository {
            params.push(("repository", repository.to_string()));
        }
        params.extend(window_params(limit, offset));

        self.get_json(url, &params).await
    }

    async fn available_queries(&self, graph: &str) -> Result<Vec<AvailableQuery>, ClientError> {
        let url = self.endpoint(&["graph", graph, "search", "query", "available"])?;
        self.get_json(url, &[]).await
    }

    async fn repositories(&self, graph: &str) -> Result<Vec<String>, ClientError> {
        let url = self.endpoint(&["graph", graph, "repositories"])?;
        self.get_json(url, &[]).await
    }

    async fn call_graph(&self, graph: &str, node_id: &str) -> Result<CallGraph, ClientError> {
        let url = self.endpoint(&["graph", graph, "node", node_id, "call_graph"])?;
        self.get_json(url, &[]).await
    }

    async fn issues(
        &self,
        graph: &str,
        category: IssueCategory,
    ) -> Result<TabularResult, ClientError> {
        let url = self.endpoint(&["graph", graph, category.endpoint()])?;
        self.get_json(url, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_trailing_slash_removed() {
        let client = BackendClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = BackendClient::new("http://gateway:8080/api/").unwrap();
        let url = client.endpoint(&["graph", "repo1", "summary"]).unwrap();
        assert_eq!(url.as_str(), "http://gateway:8080/api/graph/repo1/summary");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = BackendClient::new("http://localhost:3000").unwrap();
        let url = client.endpoint(&["graph", "my graph/x", "summary"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/graph/my%20graph%2Fx/summary");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            BackendClient::new("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(matches!(
            BackendClient::new("mailto:someone@example.com"),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
