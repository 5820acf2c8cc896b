//! Column guessing from flattened records

use super::timestamp::{detect_timestamp_format, parse_timestamp};
use super::types::{Column, ColumnType};
use crate::error::{Error, Result};
use crate::issue::{stringify, FlatRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeSet;

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+$").expect("valid regex"));

static DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("valid regex")
});

/// Infers column descriptors from a sample of flattened records
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaGuesser;

impl SchemaGuesser {
    /// Create a guesser
    pub fn new() -> Self {
        Self::default()
    }

    /// Guess columns for the union of keys across `records`, sorted by name.
    ///
    /// Optional and custom fields vary per issue, so a key seen in any
    /// record becomes a column.
    pub fn guess(&self, records: &[FlatRecord]) -> Result<Vec<Column>> {
        if records.is_empty() {
            return Err(Error::schema_guess("can't guess schema from no records"));
        }

        let names: BTreeSet<&str> = records
            .iter()
            .flat_map(|record| record.keys().map(String::as_str))
            .collect();

        let columns = names
            .into_iter()
            .map(|name| {
                let samples: Vec<&Value> =
                    records.iter().filter_map(|record| record.get(name)).collect();
                self.guess_column(name, &samples)
            })
            .collect();

        Ok(columns)
    }

    fn guess_column(&self, name: &str, samples: &[&Value]) -> Column {
        let values: Vec<String> = samples
            .iter()
            .filter(|v| !v.is_null())
            .map(|v| stringify(v))
            .collect();

        if values.is_empty() {
            return Column::new(name, ColumnType::String);
        }

        if values.iter().all(|v| INTEGER.is_match(v) && v.parse::<i64>().is_ok()) {
            return Column::new(name, ColumnType::Long);
        }

        if values.iter().all(|v| DECIMAL.is_match(v)) {
            return Column::new(name, ColumnType::Double);
        }

        if let Some(format) = common_timestamp_format(&values) {
            return Column::new(name, ColumnType::Timestamp).with_format(format);
        }

        if values.iter().all(|v| v == "true" || v == "false") {
            return Column::new(name, ColumnType::Boolean);
        }

        Column::new(name, ColumnType::String)
    }
}

/// The format detected on the first value, if every other value parses with it
fn common_timestamp_format(values: &[String]) -> Option<&'static str> {
    let format = detect_timestamp_format(values.first()?)?;
    values
        .iter()
        .all(|v| parse_timestamp(v, format).is_some())
        .then_some(format)
}
