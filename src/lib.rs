// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # jira-ingest
//!
//! An ingestion connector that turns a JQL query against an issue tracker
//! into typed tabular rows.
//!
//! ## Features
//!
//! - **Adaptive Fetching**: Issue detail is fetched on a worker pool that shrinks when the upstream reports overload
//! - **Failure Classification**: Status codes first, HTML `<title>` text when the upstream answers with an error page
//! - **Flattening**: Nested issue fields become dotted-path records
//! - **Schema Guessing**: Column types inferred from a sample of issues
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jira_ingest::{IngestConfig, IngestEngine, Mode, VecSink};
//!
//! #[tokio::main]
//! async fn main() -> jira_ingest::Result<()> {
//!     let config = IngestConfig::from_file("ingest.yml")?;
//!     let engine = IngestEngine::from_config(&config)?;
//!
//!     let columns = engine.guess().await?;
//!
//!     let mut sink = VecSink::new();
//!     let stats = engine.run(&columns, Mode::Run, &mut sink).await?;
//!     println!("{} rows", stats.rows_emitted);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        IngestEngine                          │
//! │     guess() → [Column]      run(columns, mode) → rows        │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌────────────┬────────────────┼──────────────┬─────────────────┐
//! │ QueryPager │ ConcurrentFetcher             │ to_record       │
//! │ probe      │ adaptive pool  │ RetryPolicy  │ SchemaGuesser   │
//! │ pages      │ retry rounds   │ classify     │ cast            │
//! └────────────┴────────────────┴──────────────┴─────────────────┘
//!                               │
//!                 IssueSource (JiraClient over HttpClient)
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Run configuration
pub mod config;

/// HTTP transport with credentials and throttling
pub mod http;

/// Failure classification and retry policy
pub mod retry;

/// Upstream API client
pub mod jira;

/// Issue model, lookup and flattening
pub mod issue;

/// Offset paging over search results
pub mod pagination;

/// Adaptive concurrent detail fetching
pub mod fetch;

/// Column descriptors and schema guessing
pub mod schema;

/// Casting values to column types
pub mod cast;

/// Guess / run / preview orchestration
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use cast::{Row, TypedValue};
pub use config::IngestConfig;
pub use engine::{IngestEngine, IngestStats, JsonLinesSink, RowSink, VecSink};
pub use issue::{FlatRecord, Issue};
pub use jira::{IssueSource, JiraClient};
pub use schema::{Column, ColumnType};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
