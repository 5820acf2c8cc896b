//! CLI module
//!
//! Command-line interface for one ingestion.
//!
//! # Commands
//!
//! - `check` - Verify credentials against the endpoint
//! - `guess` - Infer columns from a sample of matching issues
//! - `run` - Emit one JSON line per matching issue
//! - `preview` - Emit a few rows from a single bounded search

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
