//! Failure classification
//!
//! The upstream sometimes answers with an HTML error page where JSON was
//! expected. The page `<title>` is then the only discriminator, so title
//! sniffing is the fallback after status codes.

use crate::error::Error;
use crate::types::duration_ms;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::time::Duration;

static TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("title pattern is valid")
});

const OVERLOAD_TITLE: &str = "Unauthorized";
const UNAVAILABLE_TITLE: &str = "Page Unavailable";

/// Extract the trimmed `<title>` text of an HTML page
pub fn extract_title(body: &str) -> Option<String> {
    TITLE
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Turn a raw transport failure into the upstream taxonomy.
///
/// Errors that are already classified pass through unchanged. `timeout` is
/// the per-call budget reported when the transport itself timed out.
pub fn classify(error: Error, timeout: Duration) -> Error {
    match error {
        Error::HttpStatus { status, body } => {
            if looks_like_html(&body) {
                classify_html(&body)
            } else {
                classify_status(status, &body)
            }
        }
        Error::MalformedBody { body } => classify_html(&body),
        Error::Http(e) => {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: duration_ms(timeout),
                }
            } else if e.is_connect() || e.is_builder() {
                Error::config(format!("Could not reach the endpoint: {e}"))
            } else {
                Error::unclassified(e.to_string())
            }
        }
        other => other,
    }
}

fn classify_html(body: &str) -> Error {
    match extract_title(body) {
        Some(title) if title.contains(OVERLOAD_TITLE) => Error::overload(title),
        Some(title) if title.contains(UNAVAILABLE_TITLE) => Error::unavailable(title),
        Some(title) => Error::unclassified(title),
        None => Error::unclassified("unknown"),
    }
}

fn classify_status(status: u16, body: &str) -> Error {
    match status {
        400 | 403 | 404 => Error::config(error_messages(body).unwrap_or_else(|| {
            format!("Request rejected with HTTP {status}")
        })),
        401 | 429 => Error::overload(format!("HTTP {status}")),
        _ => Error::unclassified(format!("HTTP {status}")),
    }
}

/// Joined `errorMessages` of an upstream JSON error body
fn error_messages(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    let messages: Vec<&str> = json
        .get("errorMessages")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .collect();

    if messages.is_empty() {
        None
    } else {
        Some(messages.join(" , "))
    }
}

fn looks_like_html(body: &str) -> bool {
    let head = body.trim_start();
    head.starts_with('<') && !head.starts_with("<?xml")
}
