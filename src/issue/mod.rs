//! Issue module
//!
//! The issue model, dotted-path attribute lookup and record flattening.
//!
//! # Overview
//!
//! - `Issue` - identity plus the raw nested `fields` tree from the detail endpoint
//! - `Issue::lookup` - resolves a configured column path against `fields`
//! - `to_record` - flattens `fields` into a single-level [`FlatRecord`]

mod flatten;
mod lookup;
mod types;

pub use flatten::to_record;
pub use types::{stringify, FlatRecord, Issue};
pub(crate) use types::string_or_number;
