//! Tests for engine module

use super::*;
use crate::cast::TypedValue;
use crate::issue::Issue;
use crate::jira::{IssueRef, SearchPage};
use crate::schema::ColumnType;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// In-memory upstream
// ============================================================================

#[derive(Default)]
struct MemorySource {
    issues: Vec<Issue>,
    reject_credentials: bool,
    missing_key: Option<String>,
    searches: Mutex<Vec<(u64, u64)>>,
}

impl MemorySource {
    fn with_issues(count: usize) -> Self {
        let issues = (1..=count)
            .map(|i| {
                Issue::new(
                    i.to_string(),
                    format!("FOO-{i}"),
                    json!({
                        "summary": format!("Issue {i}"),
                        "project": {"key": "FOO", "id": "100"},
                        "labels": ["a", "b"],
                        "comment": {"total": i, "comments": []},
                        "created": "2015-03-01T00:12:00"
                    }),
                )
            })
            .collect();
        Self {
            issues,
            ..Self::default()
        }
    }

    fn searches(&self) -> Vec<(u64, u64)> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueSource for MemorySource {
    async fn search(&self, _jql: &str, start_at: u64, max_results: u64) -> Result<SearchPage> {
        self.searches.lock().unwrap().push((start_at, max_results));
        let issues = self
            .issues
            .iter()
            .skip(start_at as usize)
            .take(max_results as usize)
            .map(|i| IssueRef::new(i.id.clone(), i.key.clone()))
            .collect();
        Ok(SearchPage {
            total: self.issues.len() as u64,
            start_at,
            max_results,
            issues,
        })
    }

    async fn issue(&self, key: &str) -> Result<Issue> {
        if self.missing_key.as_deref() == Some(key) {
            return Err(Error::http_status(404, r#"{"errorMessages":["Issue Does Not Exist"]}"#));
        }
        self.issues
            .iter()
            .find(|i| i.key == key)
            .cloned()
            .ok_or_else(|| Error::http_status(404, "{}"))
    }

    async fn check_credentials(&self) -> Result<()> {
        if self.reject_credentials {
            Err(Error::config("Could not authorize with your credential."))
        } else {
            Ok(())
        }
    }
}

fn config() -> IngestConfig {
    let mut config =
        IngestConfig::new("alice", "secret", "https://example.atlassian.net", "project = FOO");
    config.per_page = 2;
    config.guess_records = 3;
    config.preview_records = 4;
    config
}

fn engine(source: Arc<MemorySource>) -> IngestEngine {
    let policy = RetryPolicy::new()
        .with_limit(2)
        .with_backoff_unit(Duration::from_millis(1));
    IngestEngine::new(source, &config()).with_retry_policy(policy)
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("key", ColumnType::String),
        Column::new("comment.total", ColumnType::Long),
        Column::new("project.key", ColumnType::String),
        Column::new("created", ColumnType::Timestamp).with_format("%Y-%m-%dT%H:%M:%S"),
        Column::new("fixVersions", ColumnType::String),
    ]
}

// ============================================================================
// IngestStats Tests
// ============================================================================

#[test]
fn test_stats_counters() {
    let mut stats = IngestStats::new();
    stats.add_page();
    stats.add_rows(3);
    stats.add_rows(2);
    stats.set_duration(10);
    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(stats.rows_emitted, 5);
    assert_eq!(stats.duration_ms, 10);
}

// ============================================================================
// Sink Tests
// ============================================================================

#[test]
fn test_json_lines_sink() {
    let cols = vec![
        Column::new("key", ColumnType::String),
        Column::new("votes", ColumnType::Long),
    ];
    let mut sink = JsonLinesSink::new(Vec::new(), &cols);
    sink.add(vec![TypedValue::String("FOO-1".into()), TypedValue::Long(3)])
        .unwrap();
    sink.add(vec![TypedValue::String("FOO-2".into()), TypedValue::Null])
        .unwrap();
    sink.finish().unwrap();

    let out = String::from_utf8(sink.into_inner()).unwrap();
    let lines: Vec<Value> = out
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(
        lines,
        vec![
            json!({"key": "FOO-1", "votes": 3}),
            json!({"key": "FOO-2", "votes": null}),
        ]
    );
}

// ============================================================================
// Engine Tests
// ============================================================================

#[tokio::test]
async fn test_guess_samples_first_issues() {
    let source = Arc::new(MemorySource::with_issues(5));
    let columns = engine(source.clone()).guess().await.unwrap();

    assert_eq!(source.searches(), vec![(0, 3)]);

    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "comment.comments",
            "comment.total",
            "created",
            "id",
            "key",
            "labels",
            "project.id",
            "project.key",
            "summary",
        ]
    );
    let created = columns.iter().find(|c| c.name == "created").unwrap();
    assert_eq!(created.column_type, ColumnType::Timestamp);
    let total = columns.iter().find(|c| c.name == "comment.total").unwrap();
    assert_eq!(total.column_type, ColumnType::Long);
}

#[tokio::test]
async fn test_guess_without_matches_fails() {
    let source = Arc::new(MemorySource::default());
    let err = engine(source).guess().await.unwrap_err();
    assert!(matches!(err, Error::SchemaGuess { .. }));
}

#[tokio::test]
async fn test_run_emits_every_issue() {
    let source = Arc::new(MemorySource::with_issues(5));
    let mut sink = VecSink::new();

    let stats = engine(source.clone())
        .run(&columns(), Mode::Run, &mut sink)
        .await
        .unwrap();

    assert_eq!(stats.total, 5);
    assert_eq!(stats.pages_fetched, 3);
    assert_eq!(stats.rows_emitted, 5);
    assert!(sink.finished);

    // probe, then pages of two
    assert_eq!(source.searches(), vec![(0, 1), (0, 2), (2, 2), (4, 1)]);

    let rows = sink.into_rows();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0][0], TypedValue::String("FOO-1".into()));
    assert_eq!(rows[4][1], TypedValue::Long(5));
    assert_eq!(rows[0][2], TypedValue::String("FOO".into()));
    assert!(matches!(rows[0][3], TypedValue::Timestamp(_)));
    assert_eq!(rows[0][4], TypedValue::Null);
}

#[tokio::test]
async fn test_preview_is_one_bounded_search() {
    let source = Arc::new(MemorySource::with_issues(10));
    let mut sink = VecSink::new();

    let stats = engine(source.clone())
        .run(&columns(), Mode::Preview, &mut sink)
        .await
        .unwrap();

    assert_eq!(source.searches(), vec![(0, 4)]);
    assert_eq!(stats.rows_emitted, 4);
    assert_eq!(stats.total, 10);
    assert_eq!(sink.rows.len(), 4);
}

#[tokio::test]
async fn test_rejected_credentials_abort_before_search() {
    let source = Arc::new(MemorySource {
        reject_credentials: true,
        ..MemorySource::with_issues(3)
    });
    let mut sink = VecSink::new();

    let err = engine(source.clone())
        .run(&columns(), Mode::Run, &mut sink)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Config { .. }));
    assert!(source.searches().is_empty());
    assert!(!sink.finished);
}

#[tokio::test]
async fn test_failed_page_emits_nothing() {
    let source = Arc::new(MemorySource {
        missing_key: Some("FOO-4".to_string()),
        ..MemorySource::with_issues(5)
    });
    let mut sink = VecSink::new();

    let err = engine(source)
        .run(&columns(), Mode::Run, &mut sink)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Config { ref message } if message == "Issue Does Not Exist"));
    // first page (FOO-1, FOO-2) only; page two failed as a whole
    assert_eq!(sink.rows.len(), 2);
    assert!(!sink.finished);
}

#[tokio::test]
async fn test_run_requires_columns() {
    let source = Arc::new(MemorySource::with_issues(1));
    let mut sink = VecSink::new();
    let err = engine(source)
        .run(&[], Mode::Run, &mut sink)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingConfigField { .. }));
}

#[tokio::test]
async fn test_run_rejects_guess_mode() {
    let source = Arc::new(MemorySource::with_issues(1));
    let mut sink = VecSink::new();
    let err = engine(source)
        .run(&columns(), Mode::Guess, &mut sink)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

#[tokio::test]
async fn test_cast_failure_aborts_run() {
    let source = Arc::new(MemorySource::with_issues(2));
    let mut sink = VecSink::new();
    let cols = vec![Column::new("summary", ColumnType::Long)];

    let err = engine(source)
        .run(&cols, Mode::Run, &mut sink)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Cast { .. }));
    assert!(sink.rows.is_empty());
}
