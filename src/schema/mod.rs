//! Schema module
//!
//! Column descriptors and schema guessing from flattened issue records.
//!
//! # Features
//!
//! - **Union of Keys**: Columns come from every sampled record, not just the first
//! - **Narrowest Type**: long, double, timestamp, boolean, then string
//! - **Timestamp Formats**: The detected format is kept on the column

mod inference;
mod timestamp;
mod types;

pub use inference::SchemaGuesser;
pub use timestamp::{detect_timestamp_format, parse_timestamp, TIMESTAMP_FORMATS};
pub use types::{Column, ColumnType};
