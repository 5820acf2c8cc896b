//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::IngestConfig;
use crate::engine::{IngestEngine, JsonLinesSink, RowSink};
use crate::error::{Error, Result};
use crate::schema::Column;
use crate::types::Mode;
use serde::Serialize;
use serde_json::json;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use tracing::info;

/// Document printed by `guess`
#[derive(Debug, Serialize)]
struct GuessOutput<'a> {
    columns: &'a [Column],
}

/// CLI runner
pub struct Runner {
    cli: Cli,
    config: IngestConfig,
}

impl Runner {
    /// Create a runner for an already loaded config
    pub fn new(cli: Cli, config: IngestConfig) -> Self {
        Self { cli, config }
    }

    /// Load the config named by `--config`
    pub fn load_config(cli: &Cli) -> Result<IngestConfig> {
        let path = cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("No config file given, use --config <file>"))?;
        IngestConfig::from_file(path)
    }

    /// Default log level: `--verbose`, then the config, then INFO
    pub fn log_level(cli: &Cli, config: Option<&IngestConfig>) -> tracing::Level {
        if cli.verbose {
            return tracing::Level::DEBUG;
        }
        config
            .and_then(|c| c.log_level)
            .map_or(tracing::Level::INFO, Into::into)
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let engine = IngestEngine::from_config(&self.config)?;

        match &self.cli.command {
            Commands::Check => {
                engine.check().await?;
                info!("Credentials accepted by {}", self.config.uri);
                println!("{}", json!({"status": "SUCCEEDED"}));
                Ok(())
            }
            Commands::Guess => {
                let columns = engine.guess().await?;
                let stdout = io::stdout();
                write_columns(&columns, self.cli.format, &mut stdout.lock())
            }
            Commands::Run { output } => {
                let columns = self.config.require_columns()?;
                match output {
                    Some(path) => {
                        let file = BufWriter::new(File::create(path)?);
                        let mut sink = JsonLinesSink::new(file, columns);
                        self.emit(&engine, columns, Mode::Run, &mut sink).await
                    }
                    None => {
                        let stdout = io::stdout();
                        let mut sink = JsonLinesSink::new(stdout.lock(), columns);
                        self.emit(&engine, columns, Mode::Run, &mut sink).await
                    }
                }
            }
            Commands::Preview => {
                let columns = self.config.require_columns()?;
                let stdout = io::stdout();
                let mut sink = JsonLinesSink::new(stdout.lock(), columns);
                self.emit(&engine, columns, Mode::Preview, &mut sink).await
            }
        }
    }

    async fn emit(
        &self,
        engine: &IngestEngine,
        columns: &[Column],
        mode: Mode,
        sink: &mut dyn RowSink,
    ) -> Result<()> {
        let stats = engine.run(columns, mode, sink).await?;
        info!(
            "{} issues matched, {} rows written",
            stats.total, stats.rows_emitted
        );
        Ok(())
    }
}

/// Print guessed columns in the requested format
pub(crate) fn write_columns(
    columns: &[Column],
    format: OutputFormat,
    writer: &mut impl Write,
) -> Result<()> {
    let output = GuessOutput { columns };
    match format {
        OutputFormat::Yaml => write!(writer, "{}", serde_yaml::to_string(&output)?)?,
        OutputFormat::Json => writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?,
    }
    writer.flush()?;
    Ok(())
}
