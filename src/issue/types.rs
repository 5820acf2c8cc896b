//! Issue and record types

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One tracked issue as returned by the detail endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Upstream numeric id (kept as text, the API sends a string)
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Human-readable key, e.g. `FOO-1`
    pub key: String,

    /// Arbitrarily nested field tree
    #[serde(default)]
    pub fields: Value,
}

impl Issue {
    /// Create an issue from its parts
    pub fn new(id: impl Into<String>, key: impl Into<String>, fields: Value) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            fields,
        }
    }
}

pub(crate) fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// Single-level mapping from dotted paths to scalar or pre-stringified values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatRecord(BTreeMap<String, Value>);

impl FlatRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Get a value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Keys in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

/// Text form of a JSON value as used in joined lists and guessing.
///
/// Strings are taken verbatim, null becomes the empty string, containers
/// are serialized as JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
