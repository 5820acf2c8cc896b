//! Flattening of an issue's field tree into a single-level record
//!
//! The accumulated path depth (number of `.` separators) decides how an
//! object is handled: shallow objects are walked, deeper ones collapse to a
//! single identifying field or to their JSON text.

use super::types::{stringify, FlatRecord, Issue};
use crate::types::JsonObject;
use serde_json::Value;

/// Fields tried, in order, when collapsing a deep object
const IDENTIFYING_FIELDS: [&str; 3] = ["id", "key", "name"];

/// Objects at a path with more separators than this are collapsed
const MAX_WALK_DEPTH: usize = 1;

/// Flatten one issue into a record keyed by dotted paths
pub fn to_record(issue: &Issue) -> FlatRecord {
    let mut record = FlatRecord::new();
    record.insert("id", Value::String(issue.id.clone()));
    record.insert("key", Value::String(issue.key.clone()));

    flatten_value(&mut record, &issue.fields, "");

    record
}

fn flatten_value(record: &mut FlatRecord, value: &Value, path: &str) {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {
            record.insert(path, value.clone());
        }
        Value::Object(map) => flatten_object(record, map, path),
        Value::Array(items) => flatten_array(record, items, path),
    }
}

fn flatten_object(record: &mut FlatRecord, map: &JsonObject, path: &str) {
    if depth(path) > MAX_WALK_DEPTH {
        collapse_object(record, map, path);
        return;
    }

    for (key, child) in map {
        flatten_value(record, child, &child_path(path, key));
    }
}

fn flatten_array(record: &mut FlatRecord, items: &[Value], path: &str) {
    if items.is_empty() || !items.iter().all(Value::is_object) {
        let joined = items.iter().map(stringify).collect::<Vec<_>>().join(",");
        record.insert(path, Value::String(format!("\"{joined}\"")));
        return;
    }

    flatten_object(record, &transpose(items), path);
}

/// Turn a list of objects into one object of lists.
///
/// Every key seen in any element maps to the per-element values in element
/// order, with null where an element lacks the key.
fn transpose(items: &[Value]) -> JsonObject {
    let mut keys: Vec<&String> = Vec::new();
    for item in items {
        if let Value::Object(map) = item {
            for key in map.keys() {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
    }

    keys.into_iter()
        .map(|key| {
            let column = items
                .iter()
                .map(|item| item.get(key).cloned().unwrap_or(Value::Null))
                .collect();
            (key.clone(), Value::Array(column))
        })
        .collect()
}

fn collapse_object(record: &mut FlatRecord, map: &JsonObject, path: &str) {
    let identifying = IDENTIFYING_FIELDS
        .iter()
        .find_map(|field| map.get(*field).filter(|v| !v.is_null()).map(|v| (*field, v)));

    match identifying {
        Some((field, value)) => {
            let value = match value {
                Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
                scalar => scalar.clone(),
            };
            record.insert(child_path(path, field), value);
        }
        None => {
            let json = Value::Object(map.clone()).to_string();
            record.insert(path, Value::String(json));
        }
    }
}

fn depth(path: &str) -> usize {
    path.matches('.').count()
}

fn child_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}
