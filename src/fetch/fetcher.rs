//! Round-based issue detail retrieval

use super::concurrency::{ConcurrencyBounds, ConcurrencyState};
use crate::error::{Error, Result};
use crate::issue::Issue;
use crate::jira::IssueSource;
use crate::retry::{Attempt, RetryPolicy};
use crate::types::duration_ms;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tracing::{debug, info};

/// Fetches full issue detail for a page of keys.
///
/// Each round dispatches the pending keys on a pool of the current size and
/// waits for all of them. Keys that hit upstream overload form the next
/// round; any fatal failure aborts the whole call.
#[derive(Debug, Clone)]
pub struct ConcurrentFetcher {
    policy: RetryPolicy,
    bounds: ConcurrencyBounds,
    retry_budget: u32,
    batch_timeout: Duration,
}

impl ConcurrentFetcher {
    /// Create a fetcher whose retry budget and batch timeout follow `policy`
    pub fn new(policy: RetryPolicy, bounds: ConcurrencyBounds) -> Self {
        let max = u32::try_from(bounds.max).unwrap_or(u32::MAX).max(1);
        Self {
            retry_budget: policy.limit,
            batch_timeout: policy.timeout.saturating_mul(max),
            policy,
            bounds,
        }
    }

    #[must_use]
    pub fn with_batch_timeout(mut self, timeout: Duration) -> Self {
        self.batch_timeout = timeout;
        self
    }

    pub fn bounds(&self) -> ConcurrencyBounds {
        self.bounds
    }

    /// Fetch every key, returning issues in the order of `keys`.
    ///
    /// Exceeding the batch timeout aborts the call with [`Error::Timeout`].
    pub async fn fetch(&self, source: &dyn IssueSource, keys: &[String]) -> Result<Vec<Issue>> {
        match tokio::time::timeout(self.batch_timeout, self.fetch_rounds(source, keys)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout {
                timeout_ms: duration_ms(self.batch_timeout),
            }),
        }
    }

    async fn fetch_rounds(&self, source: &dyn IssueSource, keys: &[String]) -> Result<Vec<Issue>> {
        let mut state = ConcurrencyState::new(self.bounds);
        let mut fetched: Vec<Option<Issue>> = vec![None; keys.len()];
        let mut pending: Vec<usize> = (0..keys.len()).collect();
        let mut round = 0u32;

        while !pending.is_empty() {
            round += 1;
            let all_items = pending.len();
            debug!(
                "Round {}: fetching {} issues with concurrency {}",
                round,
                all_items,
                state.limit()
            );

            let outcomes: Vec<(usize, Attempt<Issue>)> = stream::iter(pending)
                .map(move |index| async move {
                    let key = keys[index].as_str();
                    (index, self.policy.attempt(|| source.issue(key)).await)
                })
                .buffer_unordered(state.limit())
                .collect()
                .await;

            let mut failed = Vec::new();
            let mut last_error = None;
            for (index, outcome) in outcomes {
                match outcome {
                    Attempt::Success(issue) => fetched[index] = Some(issue),
                    Attempt::Retryable(e) => {
                        failed.push(index);
                        last_error = Some(e);
                    }
                    Attempt::Fatal(e) => return Err(e),
                }
            }

            if failed.is_empty() {
                break;
            }

            if round > self.retry_budget {
                return Err(last_error
                    .unwrap_or_else(|| Error::overload("retry rounds exhausted")));
            }

            let previous = state.limit();
            let limit = state.adjust(all_items, failed.len(), round, self.retry_budget);
            let wait = self.policy.calculate_backoff(round);
            info!(
                "{} of {} issues overloaded in round {}, concurrency {} -> {}, retrying in {:?}",
                failed.len(),
                all_items,
                round,
                previous,
                limit,
                wait
            );
            tokio::time::sleep(wait).await;

            // Keep input order among redispatched keys
            failed.sort_unstable();
            pending = failed;
        }

        Ok(fetched.into_iter().flatten().collect())
    }
}
