//! Engine types
//!
//! Row sinks and run statistics.

use crate::cast::Row;
use crate::error::Result;
use crate::schema::Column;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Write;

/// Destination of emitted rows.
///
/// `add` is called once per issue, a page at a time; `finish` once after
/// the last page.
pub trait RowSink {
    fn add(&mut self, row: Row) -> Result<()>;

    fn finish(&mut self) -> Result<()>;
}

/// Collects rows in memory
#[derive(Debug, Default)]
pub struct VecSink {
    pub rows: Vec<Row>,
    pub finished: bool,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl RowSink for VecSink {
    fn add(&mut self, row: Row) -> Result<()> {
        self.rows.push(row);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// Writes one JSON object per row, keyed by column name
pub struct JsonLinesSink<W: Write> {
    writer: W,
    names: Vec<String>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W, columns: &[Column]) -> Self {
        Self {
            writer,
            names: columns.iter().map(|c| c.name.clone()).collect(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RowSink for JsonLinesSink<W> {
    fn add(&mut self, row: Row) -> Result<()> {
        let mut object = Map::with_capacity(self.names.len());
        for (name, value) in self.names.iter().zip(row) {
            object.insert(name.clone(), serde_json::to_value(value)?);
        }
        writeln!(self.writer, "{}", Value::Object(object))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Completion marker of a run or preview
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Total reported by the upstream for the query
    pub total: u64,
    /// Search pages processed
    pub pages_fetched: u64,
    /// Rows handed to the sink
    pub rows_emitted: u64,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl IngestStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    pub fn add_rows(&mut self, count: u64) {
        self.rows_emitted += count;
    }

    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
