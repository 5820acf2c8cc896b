//! Error types for the ingestion connector
//!
//! Every public API returns `Result<T, Error>`. Raw transport failures
//! (`Http`, `HttpStatus`, `MalformedBody`) are turned into the upstream
//! taxonomy by [`crate::retry::classify`] before the retry policy looks at
//! them, so callers above the retry layer only ever see classified errors.

use thiserror::Error;

/// The main error type for the connector
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Upstream Failures (classified)
    // ============================================================================
    #[error("Upstream overloaded: {message}")]
    TransientOverload { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("Upstream error: {message}")]
    Unclassified { message: String },

    // ============================================================================
    // Transport Errors (raw, before classification)
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Malformed response body: {body}")]
    MalformedBody { body: String },

    // ============================================================================
    // Data Errors
    // ============================================================================
    #[error("Cannot cast '{value}' to {target}: {message}")]
    Cast {
        value: String,
        target: String,
        message: String,
    },

    #[error("Schema guess failed: {message}")]
    SchemaGuess { message: String },

    // ============================================================================
    // I/O and Generic Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an overload error
    pub fn overload(message: impl Into<String>) -> Self {
        Self::TransientOverload {
            message: message.into(),
        }
    }

    /// Create a service unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Create an unclassified upstream error
    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::Unclassified {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a cast error
    pub fn cast(
        value: impl Into<String>,
        target: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Cast {
            value: value.into(),
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a schema guess error
    pub fn schema_guess(message: impl Into<String>) -> Self {
        Self::SchemaGuess {
            message: message.into(),
        }
    }

    /// Check if the retry policy may try this error again
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::TransientOverload { .. } | Error::Timeout { .. } | Error::Unclassified { .. }
        )
    }
}

/// Result type alias for the connector
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
