//! Upstream API module
//!
//! The search, issue detail and current-user endpoints behind the
//! [`IssueSource`] trait, so the fetcher and engine can run against fakes.

mod client;
mod types;

pub use client::{IssueSource, JiraClient, ISSUE_PATH, MYSELF_PATH, SEARCH_PATH};
pub use types::{IssueRef, SearchPage};
