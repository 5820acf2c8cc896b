//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Turn a JQL query into typed rows
#[derive(Parser, Debug)]
#[command(name = "jira-ingest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Ingestion config file (YAML, or JSON with a .json extension)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format of `guess`
    #[arg(short, long, global = true, default_value = "yaml")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Verify credentials
    Check,

    /// Guess columns from the first matching issues
    Guess,

    /// Emit every matching issue as a JSON line
    Run {
        /// Write rows to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Emit a few rows from one bounded search
    Preview,
}

/// Output format for guessed columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `columns:` document in YAML
    Yaml,
    /// Pretty JSON
    Json,
}
