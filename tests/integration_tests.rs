//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML config → search/detail requests → columns or JSON lines

use jira_ingest::retry::RetryPolicy;
use jira_ingest::{ColumnType, Error, IngestConfig, IngestEngine, JsonLinesSink, Mode};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn config_for(server: &MockServer) -> IngestConfig {
    let yaml = format!(
        r#"
username: alice
password: secret
uri: "{}"
jql: "project = FOO"
per_page: 2
guess_records: 3
columns:
  - {{name: key, type: string}}
  - {{name: project.key, type: string}}
  - {{name: labels, type: string}}
  - {{name: votes.votes, type: long}}
  - {{name: created, type: timestamp, format: "%Y-%m-%dT%H:%M:%S%.f%z"}}
  - {{name: watching, type: boolean}}
"#,
        server.uri()
    );
    IngestConfig::from_yaml_str(&yaml).unwrap()
}

fn engine_for(server: &MockServer) -> IngestEngine {
    let policy = RetryPolicy::new()
        .with_limit(3)
        .with_timeout(Duration::from_secs(5))
        .with_backoff_unit(Duration::from_millis(5));
    IngestEngine::from_config(&config_for(server))
        .unwrap()
        .with_retry_policy(policy)
}

fn issue_json(n: u32) -> Value {
    json!({
        "id": format!("1000{n}"),
        "key": format!("FOO-{n}"),
        "fields": {
            "project": {"id": "100", "key": "FOO", "name": "Foo"},
            "labels": ["backend", "urgent"],
            "votes": {"votes": n, "hasVoted": false},
            "created": "2019-04-01T10:00:00.000+0900",
            "watching": false,
            "comment": {"comments": [{"id": "1", "body": "hi"}, {"id": "2", "body": "yo"}]}
        }
    })
}

fn search_json(total: u64, keys: &[u32]) -> Value {
    json!({
        "startAt": 0,
        "maxResults": keys.len(),
        "total": total,
        "issues": keys.iter().map(|n| json!({"id": format!("1000{n}"), "key": format!("FOO-{n}")})).collect::<Vec<_>>()
    })
}

async fn mount_myself(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/api/latest/myself"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "alice"})))
        .mount(server)
        .await;
}

async fn mount_issue(server: &MockServer, n: u32) {
    Mock::given(method("GET"))
        .and(path(format!("/rest/api/latest/issue/FOO-{n}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue_json(n)))
        .mount(server)
        .await;
}

async fn mount_search(server: &MockServer, start_at: u64, max_results: u64, body: Value) {
    Mock::given(method("GET"))
        .and(path("/rest/api/latest/search"))
        .and(query_param("jql", "project = FOO"))
        .and(query_param("startAt", start_at.to_string()))
        .and(query_param("maxResults", max_results.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ============================================================================
// Guess
// ============================================================================

#[tokio::test]
async fn test_guess_end_to_end() {
    let server = MockServer::start().await;
    mount_myself(&server).await;
    mount_search(&server, 0, 3, search_json(2, &[1, 2])).await;
    mount_issue(&server, 1).await;
    mount_issue(&server, 2).await;

    let columns = engine_for(&server).guess().await.unwrap();

    let summary: Vec<(&str, ColumnType)> = columns
        .iter()
        .map(|c| (c.name.as_str(), c.column_type))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("comment.comments.body", ColumnType::String),
            ("comment.comments.id", ColumnType::String),
            ("created", ColumnType::Timestamp),
            ("id", ColumnType::Long),
            ("key", ColumnType::String),
            ("labels", ColumnType::String),
            ("project.id", ColumnType::Long),
            ("project.key", ColumnType::String),
            ("project.name", ColumnType::String),
            ("votes.hasVoted", ColumnType::Boolean),
            ("votes.votes", ColumnType::Long),
            ("watching", ColumnType::Boolean),
        ]
    );

    let created = columns.iter().find(|c| c.name == "created").unwrap();
    assert_eq!(created.format.as_deref(), Some("%Y-%m-%dT%H:%M:%S%.f%z"));
}

// ============================================================================
// Run
// ============================================================================

#[tokio::test]
async fn test_run_end_to_end() {
    let server = MockServer::start().await;
    mount_myself(&server).await;
    mount_search(&server, 0, 1, search_json(3, &[1])).await;
    mount_search(&server, 0, 2, search_json(3, &[1, 2])).await;
    mount_search(&server, 2, 1, search_json(3, &[3])).await;
    for n in 1..=3 {
        mount_issue(&server, n).await;
    }

    let config = config_for(&server);
    let engine = engine_for(&server);
    let mut sink = JsonLinesSink::new(Vec::new(), &config.columns);

    let stats = engine
        .run(&config.columns, Mode::Run, &mut sink)
        .await
        .unwrap();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.rows_emitted, 3);

    let out = String::from_utf8(sink.into_inner()).unwrap();
    let rows: Vec<Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["key"], "FOO-1");
    assert_eq!(rows[0]["project.key"], "FOO");
    assert_eq!(rows[0]["labels"], "[\"backend\",\"urgent\"]");
    assert_eq!(rows[2]["votes.votes"], 3);
    assert_eq!(rows[0]["watching"], false);
    assert!(rows[0]["created"]
        .as_str()
        .unwrap()
        .starts_with("2019-04-01T01:00:00"));
}

#[tokio::test]
async fn test_preview_end_to_end() {
    let server = MockServer::start().await;
    mount_myself(&server).await;
    mount_search(&server, 0, 15, search_json(40, &[1, 2])).await;
    mount_issue(&server, 1).await;
    mount_issue(&server, 2).await;

    let config = config_for(&server);
    let mut sink = JsonLinesSink::new(Vec::new(), &config.columns);

    let stats = engine_for(&server)
        .run(&config.columns, Mode::Preview, &mut sink)
        .await
        .unwrap();

    assert_eq!(stats.total, 40);
    assert_eq!(stats.rows_emitted, 2);
    assert_eq!(stats.pages_fetched, 1);
}

// ============================================================================
// Failure handling
// ============================================================================

#[tokio::test]
async fn test_overloaded_issue_is_refetched() {
    let server = MockServer::start().await;
    mount_myself(&server).await;
    mount_search(&server, 0, 3, search_json(2, &[1, 2])).await;
    mount_issue(&server, 2).await;

    Mock::given(method("GET"))
        .and(path("/rest/api/latest/issue/FOO-1"))
        .respond_with(ResponseTemplate::new(401).set_body_string(
            "<html><head><title>Unauthorized (401)</title></head><body></body></html>",
        ))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_issue(&server, 1).await;

    let columns = engine_for(&server).guess().await.unwrap();
    assert!(columns.iter().any(|c| c.name == "votes.votes"));
}

#[tokio::test]
async fn test_page_unavailable_is_terminal() {
    let server = MockServer::start().await;
    mount_myself(&server).await;
    mount_search(&server, 0, 3, search_json(1, &[1])).await;

    Mock::given(method("GET"))
        .and(path("/rest/api/latest/issue/FOO-1"))
        .respond_with(ResponseTemplate::new(503).set_body_string(
            "<html><title>Atlassian Cloud Notifications - Page Unavailable</title></html>",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let err = engine_for(&server).guess().await.unwrap_err();
    assert!(matches!(err, Error::ServiceUnavailable { .. }));
}

#[tokio::test]
async fn test_rejected_credentials_stop_before_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/latest/myself"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/api/latest/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_json(0, &[])))
        .expect(0)
        .mount(&server)
        .await;

    let err = engine_for(&server).guess().await.unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
    assert!(err.to_string().contains("Could not authorize"));
}

#[tokio::test]
async fn test_invalid_query_is_config_error() {
    let server = MockServer::start().await;
    mount_myself(&server).await;

    Mock::given(method("GET"))
        .and(path("/rest/api/latest/search"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errorMessages": ["Error in the JQL Query: Expecting either 'OR' or 'AND'"],
            "errors": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let mut sink = JsonLinesSink::new(Vec::new(), &config.columns);
    let err = engine_for(&server)
        .run(&config.columns, Mode::Run, &mut sink)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Config { ref message } if message.contains("JQL")));
}
