//! Execution engine module
//!
//! Orchestrates the three modes of an ingestion.
//!
//! # Overview
//!
//! - `guess` - sample the first issues, flatten them, infer columns
//! - `run` - page through every match, fetch detail, cast and emit rows
//! - `preview` - `run` over one bounded search, no probe
//!
//! Every page is fetched completely before any of its rows reach the sink.

mod types;

pub use types::{IngestStats, JsonLinesSink, RowSink, VecSink};

use crate::cast::{cast_row, Row};
use crate::config::IngestConfig;
use crate::error::{Error, Result};
use crate::fetch::ConcurrentFetcher;
use crate::http::HttpClient;
use crate::issue::{to_record, FlatRecord};
use crate::jira::{IssueSource, JiraClient};
use crate::pagination::{Page, PagePlan, QueryPager};
use crate::retry::RetryPolicy;
use crate::schema::{Column, SchemaGuesser};
use crate::types::{duration_ms, Mode};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Ingestion engine over one query
pub struct IngestEngine {
    source: Arc<dyn IssueSource>,
    policy: RetryPolicy,
    fetcher: ConcurrentFetcher,
    guesser: SchemaGuesser,
    jql: String,
    per_page: u64,
    guess_records: u64,
    preview_records: u64,
}

impl IngestEngine {
    /// Create an engine over any issue source, settings taken from `config`
    pub fn new(source: Arc<dyn IssueSource>, config: &IngestConfig) -> Self {
        Self {
            source,
            policy: config.retry_policy(),
            fetcher: config.fetcher(),
            guesser: SchemaGuesser::new(),
            jql: config.jql.clone(),
            per_page: config.per_page,
            guess_records: config.guess_records,
            preview_records: config.preview_records,
        }
    }

    /// Create an engine talking to the configured endpoint
    pub fn from_config(config: &IngestConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::with_config(config.http_config())?;
        Ok(Self::new(Arc::new(JiraClient::new(http)), config))
    }

    /// Replace the retry policy of searches and detail fetches
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.fetcher = ConcurrentFetcher::new(policy.clone(), self.fetcher.bounds());
        self.policy = policy;
        self
    }

    /// Verify credentials; never retried
    pub async fn check(&self) -> Result<()> {
        self.source.check_credentials().await
    }

    /// Infer columns from the first `guess_records` matching issues
    pub async fn guess(&self) -> Result<Vec<Column>> {
        self.check().await?;

        let pager = self.pager();
        let sample = Page {
            number: 1,
            start_at: 0,
            max_results: self.guess_records,
        };
        let refs = pager.fetch_page(&sample).await?;
        let issues = self.fetcher.fetch(self.source.as_ref(), &refs.keys()).await?;

        let records: Vec<FlatRecord> = issues.iter().map(to_record).collect();
        info!("Guessing columns from {} issues", records.len());
        self.guesser.guess(&records)
    }

    /// Emit one row per matching issue into `sink`.
    ///
    /// `Mode::Preview` issues a single bounded search instead of paging.
    pub async fn run(
        &self,
        columns: &[Column],
        mode: Mode,
        sink: &mut dyn RowSink,
    ) -> Result<IngestStats> {
        if columns.is_empty() {
            return Err(Error::missing_field("columns"));
        }

        self.check().await?;

        let start = Instant::now();
        let pager = self.pager();
        let plan = match mode {
            Mode::Run => pager.plan(self.per_page).await?,
            Mode::Preview => PagePlan::preview(self.preview_records),
            Mode::Guess => {
                return Err(Error::config("guess mode produces columns, not rows"));
            }
        };

        let page_count = plan.page_count();
        info!(
            "Starting {} over {} issues in {} pages",
            mode,
            plan.expected_results(),
            page_count
        );

        let mut stats = IngestStats::new();
        if let PagePlan::Full { total, .. } = plan {
            stats.total = total;
        }

        for page in plan.pages() {
            info!("Fetching page {} / {}", page.number, page_count);
            let refs = pager.fetch_page(&page).await?;
            if mode == Mode::Preview {
                stats.total = refs.total;
            }

            let rows = self.fetch_rows(&refs.keys(), columns).await?;
            let count = rows.len() as u64;
            for row in rows {
                sink.add(row)?;
            }
            stats.add_rows(count);
            stats.add_page();
        }

        sink.finish()?;
        stats.set_duration(duration_ms(start.elapsed()));
        info!(
            "Finished {}: {} rows from {} pages in {}ms",
            mode, stats.rows_emitted, stats.pages_fetched, stats.duration_ms
        );
        Ok(stats)
    }

    /// Fetch and cast one page; nothing is returned unless every issue resolved
    async fn fetch_rows(&self, keys: &[String], columns: &[Column]) -> Result<Vec<Row>> {
        let issues = self.fetcher.fetch(self.source.as_ref(), keys).await?;
        issues
            .iter()
            .map(|issue| cast_row(issue, columns))
            .collect()
    }

    fn pager(&self) -> QueryPager<'_> {
        QueryPager::new(self.source.as_ref(), &self.policy, &self.jql)
    }
}

impl std::fmt::Debug for IngestEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestEngine")
            .field("jql", &self.jql)
            .field("policy", &self.policy)
            .field("fetcher", &self.fetcher)
            .field("per_page", &self.per_page)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
