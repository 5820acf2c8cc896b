//! Configuration for an ingestion run
//!
//! The resolved query object: credentials, endpoint, JQL, target columns,
//! paging, retry and concurrency settings. Loaded from YAML (or JSON) and
//! validated before any request is made.

use crate::error::{Error, Result, ResultExt};
use crate::fetch::{ConcurrencyBounds, ConcurrentFetcher, MAX_CONCURRENCY, MIN_CONCURRENCY};
use crate::http::{Credentials, HttpClientConfig, RateLimiterConfig};
use crate::retry::RetryPolicy;
use crate::schema::Column;
use crate::types::{BackoffType, LogLevel};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const DEFAULT_PER_PAGE: u64 = 50;
pub const DEFAULT_GUESS_RECORDS: u64 = 10;
pub const DEFAULT_PREVIEW_RECORDS: u64 = 15;
pub const MAX_RETRY_LIMIT: u32 = 10;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Everything one ingestion run needs
#[derive(Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Account name for Basic credentials
    #[serde(default)]
    pub username: String,

    /// Password or API token
    #[serde(default)]
    pub password: String,

    /// Base endpoint, e.g. `https://example.atlassian.net`
    #[serde(default)]
    pub uri: String,

    /// Query selecting the issues
    #[serde(default)]
    pub jql: String,

    /// Target columns for run and preview
    #[serde(default)]
    pub columns: Vec<Column>,

    /// Issues per search request
    #[serde(default = "default_per_page")]
    pub per_page: u64,

    /// Issues sampled by guess
    #[serde(default = "default_guess_records")]
    pub guess_records: u64,

    /// Issues fetched by preview
    #[serde(default = "default_preview_records")]
    pub preview_records: u64,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub concurrency: ConcurrencyConfig,

    /// Optional global request throttle
    #[serde(default)]
    pub requests_per_second: Option<u32>,

    /// Default log level for the binary
    #[serde(default)]
    pub log_level: Option<LogLevel>,
}

fn default_per_page() -> u64 {
    DEFAULT_PER_PAGE
}

fn default_guess_records() -> u64 {
    DEFAULT_GUESS_RECORDS
}

fn default_preview_records() -> u64 {
    DEFAULT_PREVIEW_RECORDS
}

impl std::fmt::Debug for IngestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("uri", &self.uri)
            .field("jql", &self.jql)
            .field("columns", &self.columns)
            .field("per_page", &self.per_page)
            .field("guess_records", &self.guess_records)
            .field("preview_records", &self.preview_records)
            .field("retry", &self.retry)
            .field("concurrency", &self.concurrency)
            .field("requests_per_second", &self.requests_per_second)
            .field("log_level", &self.log_level)
            .finish()
    }
}

// ============================================================================
// Retry and Concurrency
// ============================================================================

/// Retry settings shared by single calls and fetch rounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retry budget
    #[serde(default = "default_retry_limit")]
    pub limit: u32,

    /// Backoff unit in seconds
    #[serde(default = "default_initial_wait_secs")]
    pub initial_wait_secs: u64,

    /// Wall-clock budget of one call in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub backoff: BackoffType,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            limit: default_retry_limit(),
            initial_wait_secs: default_initial_wait_secs(),
            timeout_secs: default_timeout_secs(),
            backoff: BackoffType::default(),
        }
    }
}

fn default_retry_limit() -> u32 {
    10
}

fn default_initial_wait_secs() -> u64 {
    1
}

fn default_timeout_secs() -> u64 {
    300
}

/// Worker pool bounds of the fetcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcurrencyConfig {
    #[serde(default = "default_min_concurrency")]
    pub min: usize,

    #[serde(default = "default_max_concurrency")]
    pub max: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            min: MIN_CONCURRENCY,
            max: MAX_CONCURRENCY,
        }
    }
}

fn default_min_concurrency() -> usize {
    MIN_CONCURRENCY
}

fn default_max_concurrency() -> usize {
    MAX_CONCURRENCY
}

// ============================================================================
// Loading and Validation
// ============================================================================

impl IngestConfig {
    /// Minimal config with defaults for everything optional
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        uri: impl Into<String>,
        jql: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            uri: uri.into(),
            jql: jql.into(),
            columns: Vec::new(),
            per_page: DEFAULT_PER_PAGE,
            guess_records: DEFAULT_GUESS_RECORDS,
            preview_records: DEFAULT_PREVIEW_RECORDS,
            retry: RetryConfig::default(),
            concurrency: ConcurrencyConfig::default(),
            requests_per_second: None,
            log_level: None,
        }
    }

    #[must_use]
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = columns;
        self
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json` file or, for any other extension, a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// Check required fields and value ranges
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("username", &self.username),
            ("password", &self.password),
            ("uri", &self.uri),
            ("jql", &self.jql),
        ] {
            if value.trim().is_empty() {
                return Err(Error::missing_field(field));
            }
        }

        let url = Url::parse(&self.uri)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "uri",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        for (field, value) in [
            ("per_page", self.per_page),
            ("guess_records", self.guess_records),
            ("preview_records", self.preview_records),
            ("retry.initial_wait_secs", self.retry.initial_wait_secs),
            ("retry.timeout_secs", self.retry.timeout_secs),
        ] {
            if value < 1 {
                return Err(Error::invalid_value(field, "must be at least 1"));
            }
        }

        if self.retry.limit > MAX_RETRY_LIMIT {
            return Err(Error::invalid_value(
                "retry.limit",
                format!("must be between 0 and {MAX_RETRY_LIMIT}"),
            ));
        }

        if self.concurrency.min < 1 {
            return Err(Error::invalid_value("concurrency.min", "must be at least 1"));
        }
        if self.concurrency.max < self.concurrency.min {
            return Err(Error::invalid_value(
                "concurrency.max",
                "must not be smaller than concurrency.min",
            ));
        }

        if self.requests_per_second == Some(0) {
            return Err(Error::invalid_value("requests_per_second", "must be at least 1"));
        }

        Ok(())
    }

    /// Columns are required when rows are produced
    pub fn require_columns(&self) -> Result<&[Column]> {
        if self.columns.is_empty() {
            return Err(Error::missing_field("columns"));
        }
        Ok(&self.columns)
    }

    // ========================================================================
    // Derived Settings
    // ========================================================================

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password)
    }

    /// Transport settings; the reqwest timeout backs up the policy's own
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.uri.trim_end_matches('/'))
            .timeout(self.call_timeout())
            .credentials(self.credentials());

        if let Some(rps) = self.requests_per_second {
            builder = builder.rate_limit(RateLimiterConfig::per_second(rps));
        }

        builder.build()
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.retry.timeout_secs)
    }

    /// Wall-clock budget of a whole fetch call
    pub fn batch_timeout(&self) -> Duration {
        let max = u32::try_from(self.concurrency.max).unwrap_or(u32::MAX);
        self.call_timeout().saturating_mul(max)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new()
            .with_limit(self.retry.limit)
            .with_timeout(self.call_timeout())
            .with_backoff_unit(Duration::from_secs(self.retry.initial_wait_secs))
            .with_backoff_type(self.retry.backoff)
    }

    pub fn concurrency_bounds(&self) -> ConcurrencyBounds {
        ConcurrencyBounds::new(self.concurrency.min, self.concurrency.max)
    }

    pub fn fetcher(&self) -> ConcurrentFetcher {
        ConcurrentFetcher::new(self.retry_policy(), self.concurrency_bounds())
            .with_batch_timeout(self.batch_timeout())
    }
}
