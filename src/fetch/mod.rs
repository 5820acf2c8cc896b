//! Concurrent fetch module
//!
//! Retrieves full issue detail for one page of keys against an upstream
//! that enforces an unadvertised, per-account concurrency ceiling.
//!
//! # Overview
//!
//! - `ConcurrentFetcher` - round driver over a bounded `buffer_unordered` pool
//! - `ConcurrencyState` - pool size owned by a single fetch call
//! - `next_limit` - the tuning rule applied between rounds
//!
//! # Example
//!
//! ```ignore
//! let fetcher = ConcurrentFetcher::new(RetryPolicy::new(), ConcurrencyBounds::default());
//! let issues = fetcher.fetch(&client, &page.keys()).await?;
//! ```

mod concurrency;
mod fetcher;

pub use concurrency::{
    next_limit, ConcurrencyBounds, ConcurrencyState, MAX_CONCURRENCY, MIN_CONCURRENCY,
};
pub use fetcher::ConcurrentFetcher;
