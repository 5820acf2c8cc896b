//! Casting of raw attribute values into column types

use super::types::{Row, TypedValue};
use crate::error::{Error, Result};
use crate::issue::{stringify, Issue};
use crate::schema::{detect_timestamp_format, parse_timestamp, Column, ColumnType};
use serde_json::Value;

/// Cast a looked-up value to the column's type.
///
/// `None` and JSON null pass through as [`TypedValue::Null`] whatever the
/// type. Booleans are a loose truthiness check: only JSON `false` is false.
pub fn cast(value: Option<&Value>, column: &Column) -> Result<TypedValue> {
    let value = match value {
        None | Some(Value::Null) => return Ok(TypedValue::Null),
        Some(v) => v,
    };

    match column.column_type {
        ColumnType::Long => cast_long(value).map(TypedValue::Long),
        ColumnType::Double => cast_double(value).map(TypedValue::Double),
        ColumnType::Timestamp => {
            cast_timestamp(value, column.format.as_deref()).map(TypedValue::Timestamp)
        }
        ColumnType::Boolean => Ok(TypedValue::Boolean(!matches!(value, Value::Bool(false)))),
        ColumnType::String => Ok(TypedValue::String(stringify(value))),
    }
}

/// Build a row by looking up and casting every column of `issue`
pub fn cast_row(issue: &Issue, columns: &[Column]) -> Result<Row> {
    columns
        .iter()
        .map(|column| cast(issue.lookup(&column.name).as_ref(), column))
        .collect()
}

fn cast_long(value: &Value) -> Result<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .ok_or_else(|| Error::cast(n.to_string(), "long", "out of range")),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| Error::cast(s.clone(), "long", e.to_string())),
        other => Err(Error::cast(other.to_string(), "long", "not a number")),
    }
}

fn cast_double(value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| Error::cast(n.to_string(), "double", "out of range")),
        Value::String(s) => {
            let parsed = s
                .trim()
                .parse::<f64>()
                .map_err(|e| Error::cast(s.clone(), "double", e.to_string()))?;
            if parsed.is_finite() {
                Ok(parsed)
            } else {
                Err(Error::cast(s.clone(), "double", "not a finite number"))
            }
        }
        other => Err(Error::cast(other.to_string(), "double", "not a number")),
    }
}

fn cast_timestamp(value: &Value, format: Option<&str>) -> Result<chrono::DateTime<chrono::Utc>> {
    let Value::String(text) = value else {
        return Err(Error::cast(value.to_string(), "timestamp", "not a string"));
    };

    format
        .and_then(|f| parse_timestamp(text, f))
        .or_else(|| detect_timestamp_format(text).and_then(|f| parse_timestamp(text, f)))
        .ok_or_else(|| Error::cast(text.clone(), "timestamp", "unrecognized timestamp format"))
}
