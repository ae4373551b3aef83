//! HTTP client tests against a mock backend.

use repograph_core::model::Row;
use repograph_core::{Backend, BackendClient, ClientError, GraphStatus, GraphUpload, IssueCategory};
use repograph_core::client::UploadFile;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header_regex, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_list_graphs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metadata/graphs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "repo1", "description": "first", "created": "2024-05-01T10:00:00Z", "status": "CREATED"},
            {"id": "2", "name": "repo2", "description": "", "created": "2024-05-02T10:00:00", "status": "PENDING"},
            {"id": 3, "name": "repo3", "created": "2024-05-03T10:00:00Z"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri()).unwrap();
    let graphs = client.list_graphs().await.unwrap();

    assert_eq!(graphs.len(), 3);
    assert_eq!(graphs[0].id, "1");
    assert_eq!(graphs[1].status, GraphStatus::Pending);
    assert_eq!(graphs[2].status, GraphStatus::Created);
}

#[tokio::test]
async fn test_semantic_search_sends_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/graph/repo1/search/semantic"))
        .and(query_param("query", "parse json"))
        .and(query_param("limit", "5"))
        .and(query_param("offset", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{
                "repository": "svc",
                "function": {"id": 7, "name": "parse", "type": "function", "builtin": false, "repository_name": "svc"},
                "summarization": "Parses JSON",
                "score": 0.91
            }],
            "offset": 10,
            "limit": 5,
            "total": 11
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri()).unwrap();
    let set = client.semantic_search("repo1", "parse json", 5, 10).await.unwrap();

    assert_eq!(set.total, 11);
    assert_eq!(set.results[0].function.name, "parse");
}

#[tokio::test]
async fn test_named_query_with_repository() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/graph/repo1/search/query/3"))
        .and(query_param("repository", "svc"))
        .and(query_param("limit", "10"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "columns": ["name", "calls"],
            "data": [["main", 4], ["helper", 1]],
            "size": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri()).unwrap();
    let result = client.named_query("repo1", 3, Some("svc"), 10, 0).await.unwrap();

    assert_eq!(result.columns, vec!["name", "calls"]);
    assert_eq!(result.data[0], Row(vec![json!("main"), json!(4)]));
    assert_eq!(result.total(), 2);
}

#[tokio::test]
async fn test_named_query_omits_absent_repository() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/graph/repo1/search/query/3"))
        .and(query_param_is_missing("repository"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "columns": ["name"],
            "data": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri()).unwrap();
    let result = client.named_query("repo1", 3, None, 10, 0).await.unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_issue_endpoints() {
    let server = MockServer::start().await;
    for category in IssueCategory::ALL {
        Mock::given(method("GET"))
            .and(path(format!("/graph/repo1/{}", category.endpoint())))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "columns": ["function"],
                "data": [[category.key()]]
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = BackendClient::new(server.uri()).unwrap();
    let circular = client
        .issues("repo1", IssueCategory::CircularDependency)
        .await
        .unwrap();
    assert_eq!(circular.data[0].cells(), vec!["circular"]);

    for category in &IssueCategory::ALL[1..] {
        client.issues("repo1", *category).await.unwrap();
    }
}

#[tokio::test]
async fn test_build_graph_is_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graph/build"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"name\""))
        .and(body_string_contains("repo1"))
        .and(body_string_contains("filename=\"repo1.zip\""))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri()).unwrap();
    client
        .build_graph(GraphUpload {
            name: "repo1".to_string(),
            description: "A repo".to_string(),
            files: vec![UploadFile {
                file_name: "repo1.zip".to_string(),
                bytes: b"PK\x03\x04".to_vec(),
            }],
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_returns_raw_status() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/graph/repo1"))
        .respond_with(ResponseTemplate::new(204))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/graph/repo1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri()).unwrap();
    assert_eq!(client.delete_graph("repo1").await.unwrap(), 204);
    assert_eq!(client.delete_graph("repo1").await.unwrap(), 404);
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/graph/repo1/summary"))
        .respond_with(ResponseTemplate::new(500).set_body_string("neo4j unavailable"))
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri()).unwrap();
    let err = client.summary("repo1").await.unwrap_err();
    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "neo4j unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/graph/repo1/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = BackendClient::new(server.uri()).unwrap();
    let err = client.repositories("repo1").await.unwrap_err();
    assert!(matches!(err, ClientError::Parse(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    // Nothing listens on port 9 (discard) on the loopback in test sandboxes.
    let client = BackendClient::new("http://127.0.0.1:9").unwrap();
    let err = client.list_graphs().await.unwrap_err();
    assert!(err.is_transient());
}
