//! Common types used throughout the connector
//!
//! Shared type aliases and the small enums that several modules agree on.

use serde::{Deserialize, Serialize};
use std::time::Duration;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Ingestion Mode
// ============================================================================

/// What the host asks the connector to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Sample a few issues and infer column descriptors
    Guess,
    /// Page through every matching issue and emit rows
    #[default]
    Run,
    /// One bounded request, rows emitted without paging
    Preview,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Guess => write!(f, "guess"),
            Mode::Run => write!(f, "run"),
            Mode::Preview => write!(f, "preview"),
        }
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// How the wait between retries grows with the attempt count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Delay equal to the attempt number times the base unit
    #[default]
    Linear,
    /// Exponential increase in delay
    Exponential,
}

// ============================================================================
// Log Level
// ============================================================================

/// Default log level requested by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Whole milliseconds of `duration`, saturating at `u64::MAX`
pub(crate) fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
