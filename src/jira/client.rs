//! Issue tracker API client

use super::types::SearchPage;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::issue::Issue;
use crate::retry::extract_title;
use async_trait::async_trait;
use tracing::debug;

pub const SEARCH_PATH: &str = "rest/api/latest/search";
pub const ISSUE_PATH: &str = "rest/api/latest/issue";
pub const MYSELF_PATH: &str = "rest/api/latest/myself";

/// Source of issues: the upstream API in production, fakes in tests.
///
/// Implementations return raw failures; the retry policy classifies them.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Search for issue references matching `jql`
    async fn search(&self, jql: &str, start_at: u64, max_results: u64) -> Result<SearchPage>;

    /// Fetch the full field tree of one issue
    async fn issue(&self, key: &str) -> Result<Issue>;

    /// Verify that the configured credentials are accepted
    async fn check_credentials(&self) -> Result<()>;
}

/// [`IssueSource`] backed by the REST API
#[derive(Debug, Clone)]
pub struct JiraClient {
    http: HttpClient,
}

impl JiraClient {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl IssueSource for JiraClient {
    async fn search(&self, jql: &str, start_at: u64, max_results: u64) -> Result<SearchPage> {
        debug!("Searching issues startAt={} maxResults={}", start_at, max_results);
        let request = RequestConfig::new()
            .query("jql", jql)
            .query("startAt", start_at.to_string())
            .query("maxResults", max_results.to_string())
            .query("fields", "id,key");

        self.http.get_json(SEARCH_PATH, request).await
    }

    async fn issue(&self, key: &str) -> Result<Issue> {
        let encoded: String = url::form_urlencoded::byte_serialize(key.as_bytes()).collect();
        self.http
            .get_json(&format!("{ISSUE_PATH}/{encoded}"), RequestConfig::new())
            .await
    }

    async fn check_credentials(&self) -> Result<()> {
        match self.http.get(MYSELF_PATH, RequestConfig::new()).await {
            Ok(body) => match extract_title(&body) {
                Some(title) if title.contains("Unauthorized") => Err(unauthorized()),
                _ => Ok(()),
            },
            Err(Error::HttpStatus { status: 401, .. }) => Err(unauthorized()),
            Err(Error::HttpStatus { status, body }) => match extract_title(&body) {
                Some(title) if title.contains("Unauthorized") => Err(unauthorized()),
                _ => Err(Error::config(format!(
                    "Could not authorize with your credential: HTTP {status}"
                ))),
            },
            Err(Error::Http(e)) => Err(Error::config(format!(
                "Could not reach the endpoint: {e}"
            ))),
            Err(other) => Err(other),
        }
    }
}

fn unauthorized() -> Error {
    Error::config("Could not authorize with your credential.")
}
