//! Typed row values

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A value converted to its column's declared type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    Null,
    String(String),
    Long(i64),
    Double(f64),
    Timestamp(DateTime<Utc>),
    Boolean(bool),
}

/// One output row, values ordered like the configured columns
pub type Row = Vec<TypedValue>;
