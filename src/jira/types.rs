//! Wire types of the search endpoint

use crate::issue::string_or_number;
use serde::{Deserialize, Serialize};

/// Minimal reference to an issue as listed by a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRef {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub key: String,
}

impl IssueRef {
    pub fn new(id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
        }
    }
}

/// One page of search results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    /// Total number of issues matching the query
    pub total: u64,

    #[serde(default)]
    pub start_at: u64,

    #[serde(default)]
    pub max_results: u64,

    #[serde(default)]
    pub issues: Vec<IssueRef>,
}

impl SearchPage {
    /// Keys of the listed issues, in listing order
    pub fn keys(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.key.clone()).collect()
    }
}
