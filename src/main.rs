//! jira-ingest CLI
//!
//! Command-line interface for one ingestion; data goes to stdout, logs to stderr

use anyhow::Context;
use clap::Parser;
use jira_ingest::cli::{Cli, Runner};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Runner::load_config(&cli).context("Failed to load config")?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(Runner::log_level(&cli, Some(&config)).into()),
        )
        .init();

    let runner = Runner::new(cli, config);
    runner.run().await.context("Ingestion failed")?;
    Ok(())
}
