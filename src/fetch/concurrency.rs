//! Adaptive worker pool sizing

use serde::{Deserialize, Serialize};

/// Smallest pool the fetcher ever shrinks to
pub const MIN_CONCURRENCY: usize = 2;

/// Pool size of the first round
pub const MAX_CONCURRENCY: usize = 50;

/// Inclusive range the pool size is kept in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcurrencyBounds {
    pub min: usize,
    pub max: usize,
}

impl Default for ConcurrencyBounds {
    fn default() -> Self {
        Self {
            min: MIN_CONCURRENCY,
            max: MAX_CONCURRENCY,
        }
    }
}

impl ConcurrencyBounds {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Keep `value` inside `[min, max]`; `max` wins if the bounds are inverted.
    ///
    /// Never returns zero: a pool of zero workers would never dispatch.
    pub fn clamp(&self, value: usize) -> usize {
        value.max(self.min.max(1)).min(self.max.max(1))
    }
}

/// Pool size for the round after one that saw `fail_count` overloads out of
/// `all_items` dispatched.
///
/// Converges toward the smaller of what succeeded and what is left, and
/// drops to the floor once half the retry budget is spent or almost
/// nothing got through.
pub fn next_limit(
    current: usize,
    all_items: usize,
    fail_count: usize,
    round: u32,
    retry_budget: u32,
    bounds: ConcurrencyBounds,
) -> usize {
    let success_count = all_items.saturating_sub(fail_count);

    let next = if round >= retry_budget / 2 || success_count < bounds.min {
        bounds.min
    } else {
        fail_count.min(success_count).min(current)
    };

    bounds.clamp(next)
}

/// Pool size of one fetch call, owned by that call and dropped with it
#[derive(Debug, Clone)]
pub struct ConcurrencyState {
    limit: usize,
    bounds: ConcurrencyBounds,
}

impl ConcurrencyState {
    /// Start at the upper bound
    pub fn new(bounds: ConcurrencyBounds) -> Self {
        Self {
            limit: bounds.clamp(bounds.max),
            bounds,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Recompute the limit after a round and return it
    pub fn adjust(&mut self, all_items: usize, fail_count: usize, round: u32, retry_budget: u32) -> usize {
        self.limit = next_limit(
            self.limit,
            all_items,
            fail_count,
            round,
            retry_budget,
            self.bounds,
        );
        self.limit
    }
}
