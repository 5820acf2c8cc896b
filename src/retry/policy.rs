//! Attempt loop with timeout and backoff

use super::classify::classify;
use crate::error::{Error, Result};
use crate::types::{duration_ms, BackoffType};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Outcome of one call driven through the retry policy
#[derive(Debug)]
pub enum Attempt<T> {
    /// The call produced a value
    Success(T),
    /// Upstream overload; the caller decides whether to redispatch
    Retryable(Error),
    /// Terminal failure, or the retry limit was exhausted
    Fatal(Error),
}

impl<T> Attempt<T> {
    /// Collapse into a `Result`, treating an unhandled overload as an error
    pub fn into_result(self) -> Result<T> {
        match self {
            Attempt::Success(value) => Ok(value),
            Attempt::Retryable(e) | Attempt::Fatal(e) => Err(e),
        }
    }
}

/// Per-call retry settings
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt
    pub limit: u32,
    /// Wall-clock budget of one attempt
    pub timeout: Duration,
    /// Base unit of the backoff (one second in production)
    pub backoff_unit: Duration,
    /// How the wait grows with the attempt count
    pub backoff_type: BackoffType,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            limit: 10,
            timeout: Duration::from_secs(300),
            backoff_unit: Duration::from_secs(1),
            backoff_type: BackoffType::Linear,
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    #[must_use]
    pub fn with_backoff_type(mut self, backoff_type: BackoffType) -> Self {
        self.backoff_type = backoff_type;
        self
    }

    /// Wait before retry number `attempt` (1-based)
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        match self.backoff_type {
            BackoffType::Constant => self.backoff_unit,
            BackoffType::Linear => self.backoff_unit * attempt,
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt - 1);
                self.backoff_unit * factor
            }
        }
    }

    /// Drive `op` for the fetcher.
    ///
    /// Timeouts and unclassified failures are retried in place. Overload is
    /// handed back as [`Attempt::Retryable`] so the fetcher can shrink its
    /// pool and redispatch.
    pub async fn attempt<T, F, Fut>(&self, op: F) -> Attempt<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.drive(op, true).await
    }

    /// Drive `op` for a plain call where overload is just another retry
    pub async fn run<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.drive(op, false).await.into_result()
    }

    async fn drive<T, F, Fut>(&self, mut op: F, surface_overload: bool) -> Attempt<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0u32;

        loop {
            let error = match tokio::time::timeout(self.timeout, op()).await {
                Ok(Ok(value)) => return Attempt::Success(value),
                Ok(Err(e)) => classify(e, self.timeout),
                Err(_) => Error::Timeout {
                    timeout_ms: duration_ms(self.timeout),
                },
            };

            if surface_overload && matches!(error, Error::TransientOverload { .. }) {
                return Attempt::Retryable(error);
            }

            if !error.is_retryable() {
                return Attempt::Fatal(error);
            }

            attempt += 1;
            if attempt > self.limit {
                return Attempt::Fatal(error);
            }

            let wait = self.calculate_backoff(attempt);
            warn!(
                "Call failed ({}), retry {}/{} in {:?}",
                error, attempt, self.limit, wait
            );
            tokio::time::sleep(wait).await;
        }
    }
}
