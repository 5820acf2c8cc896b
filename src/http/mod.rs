//! HTTP client module
//!
//! Transport for the upstream API: one attempt per call, no retries.
//! Retrying and failure classification live in [`crate::retry`].
//!
//! # Features
//!
//! - **Basic Credentials**: Sent on every request
//! - **Rate Limiting**: Optional token bucket throttle using governor
//! - **Raw Failures**: Non-2xx bodies and unparseable bodies are kept for classification

mod client;
mod rate_limit;

pub use client::{Credentials, HttpClient, HttpClientConfig, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
