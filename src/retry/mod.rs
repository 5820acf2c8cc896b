//! Retry module
//!
//! Wraps outbound calls with a wall-clock timeout, turns raw transport
//! failures into the upstream error taxonomy and decides what to retry.
//!
//! # Overview
//!
//! - `classify` - the single place that inspects status codes and HTML `<title>` text
//! - `RetryPolicy` - attempt loop with linear backoff returning an [`Attempt`]
//! - `Attempt` - `Success` / `Retryable` / `Fatal`, consumed by the fetcher's round driver

mod classify;
mod policy;

pub use classify::{classify, extract_title};
pub use policy::{Attempt, RetryPolicy};
