//! Query pager

use super::types::{Page, PagePlan};
use crate::error::Result;
use crate::jira::{IssueSource, SearchPage};
use crate::retry::RetryPolicy;
use tracing::debug;

/// Splits one query into bounded search requests
pub struct QueryPager<'a> {
    source: &'a dyn IssueSource,
    policy: &'a RetryPolicy,
    jql: &'a str,
}

impl<'a> QueryPager<'a> {
    pub fn new(source: &'a dyn IssueSource, policy: &'a RetryPolicy, jql: &'a str) -> Self {
        Self {
            source,
            policy,
            jql,
        }
    }

    /// Total number of matching issues, from a search asking for one result
    pub async fn total_count(&self) -> Result<u64> {
        let probe = self.search(0, 1).await?;
        debug!("Query matches {} issues", probe.total);
        Ok(probe.total)
    }

    /// Probe the total and plan pages of `page_size` over it
    pub async fn plan(&self, page_size: u64) -> Result<PagePlan> {
        let total = self.total_count().await?;
        Ok(PagePlan::full(total, page_size))
    }

    /// Search the references of one planned page
    pub async fn fetch_page(&self, page: &Page) -> Result<SearchPage> {
        self.search(page.start_at, page.max_results).await
    }

    async fn search(&self, start_at: u64, max_results: u64) -> Result<SearchPage> {
        self.policy
            .run(|| self.source.search(self.jql, start_at, max_results))
            .await
    }
}

impl std::fmt::Debug for QueryPager<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryPager")
            .field("jql", &self.jql)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
