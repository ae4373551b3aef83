use tracing::debug;

use super::{QueryDescriptor, ResultPage};
use crate::client::{Backend, ClientError};
use crate::model::{GraphListing, SearchResultSet, TabularResult};

/// Runs a descriptor against a graph and returns one [`ResultPage`].
///
/// Every call issues exactly one request. Graphs that are still being
/// built are rejected before anything goes on the wire.
pub struct QueryExecutor<B: Backend> {
    backend: B,
}

impl<B: Backend> QueryExecutor<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub async fn execute(
        &self,
        graph: &GraphListing,
        descriptor: &QueryDescriptor,
        repository: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<ResultPage, ClientError> {
        if !graph.status.is_ready() {
            return Err(ClientError::GraphNotReady(graph.name.clone()));
        }

        let name = graph.route_name();
        debug!(graph = name, query = descriptor.label(), limit, offset, "executing query");

        match descriptor {
            QueryDescriptor::Semantic(text) => {
                let set = self.backend.semantic_search(name, text, limit, offset).await?;
                Ok(scored_page(set, limit))
            }
            QueryDescriptor::Named(query) => {
                let result = self
                    .backend
                    .named_query(name, query.id, repository, limit, offset)
                    .await?;
                Ok(tabular_page(result, limit, offset))
            }
        }
    }
}

fn scored_page(set: SearchResultSet, limit: usize) -> ResultPage {
    let mut results = set.results;
    results.truncate(limit);
    let total = set.total.max(results.len());
    ResultPage::Scored { results, total }
}

/// Normalizes a tabular response into one window.
///
/// Some backends return the whole dataset regardless of `limit`, recognisable
/// by more rows than `limit` or a `size` equal to the row count; in that case
/// the window is sliced locally. When no size is reported for a windowed
/// response, the total is inferred as `offset + rows`, so `Next` stays enabled
/// only while pages come back full.
pub(crate) fn tabular_page(result: TabularResult, limit: usize, offset: usize) -> ResultPage {
    let TabularResult {
        columns,
        data,
        size,
    } = result;

    let full_dataset = data.len() > limit || size == Some(data.len());
    if full_dataset {
        let total = size.unwrap_or(data.len()).max(data.len());
        let rows = data.into_iter().skip(offset).take(limit).collect();
        return ResultPage::Tabular {
            columns,
            rows,
            total,
        };
    }

    let total = size.unwrap_or(offset + data.len());
    ResultPage::Tabular {
        columns,
        rows: data,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Row;
    use serde_json::json;

    fn rows(n: usize) -> Vec<Row> {
        (0..n).map(|i| Row(vec![json!(i)])).collect()
    }

    #[test]
    fn test_full_dataset_is_sliced_locally() {
        let result = TabularResult {
            columns: vec!["n".to_string()],
            data: rows(25),
            size: None,
        };
        match tabular_page(result, 10, 20) {
            ResultPage::Tabular { rows, total, .. } => {
                assert_eq!(total, 25);
                assert_eq!(rows.len(), 5);
                assert_eq!(rows[0], Row(vec![json!(20)]));
            }
            other => panic!("unexpected page: {:?}", other),
        }
    }

    #[test]
    fn test_windowed_response_uses_reported_size() {
        let result = TabularResult {
            columns: vec!["n".to_string()],
            data: rows(10),
            size: Some(42),
        };
        let page = tabular_page(result, 10, 10);
        assert_eq!(page.total(), 42);
        assert_eq!(page.len(), 10);
    }

    #[test]
    fn test_full_dataset_of_one_page_is_not_repeated() {
        let full = TabularResult {
            columns: vec!["n".to_string()],
            data: rows(10),
            size: Some(10),
        };

        let first = tabular_page(full.clone(), 10, 0);
        assert_eq!(first.len(), 10);
        assert_eq!(first.total(), 10);

        let second = tabular_page(full, 10, 10);
        assert!(second.is_empty());
        assert_eq!(second.total(), 10);
    }

    #[test]
    fn test_windowed_response_without_size() {
        let result = TabularResult {
            columns: vec![],
            data: rows(3),
            size: None,
        };
        assert_eq!(tabular_page(result, 10, 30).total(), 33);
    }
}
