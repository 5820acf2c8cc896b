//! Dotted-path attribute lookup

use super::types::{stringify, Issue};
use serde_json::Value;

impl Issue {
    /// Resolve a dotted attribute path such as `project.key`.
    ///
    /// `id` and `key` resolve to the issue identity. A missing segment or a
    /// null leaf yields `None`. Crossing an array of objects resolves the rest
    /// of the path in every element and joins the results with commas.
    /// Objects and arrays at the end of the path come back as JSON text.
    pub fn lookup(&self, path: &str) -> Option<Value> {
        match path {
            "id" => return Some(Value::String(self.id.clone())),
            "key" => return Some(Value::String(self.key.clone())),
            _ => {}
        }

        let segments: Vec<&str> = path.split('.').collect();
        resolve(&self.fields, &segments)
    }
}

fn resolve(value: &Value, segments: &[&str]) -> Option<Value> {
    let Some((head, rest)) = segments.split_first() else {
        return render(value);
    };

    match value {
        Value::Object(map) => resolve(map.get(*head)?, rest),
        Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
            let parts: Vec<String> = items
                .iter()
                .map(|item| {
                    resolve(item, segments)
                        .map(|v| stringify(&v))
                        .unwrap_or_default()
                })
                .collect();
            Some(Value::String(parts.join(",")))
        }
        _ => None,
    }
}

fn render(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Bool(_) | Value::Number(_) | Value::String(_) => Some(value.clone()),
        Value::Array(_) | Value::Object(_) => Some(Value::String(value.to_string())),
    }
}
