///
/// This module implements the CLI interface for trello-backup: command parsing,
/// config loading and wiring of the Trello source to the configured sink.
///
/// All export logic (models, rate limiting, aggregation, CSV) lives in the
/// [`trello-backup-core`] crate. This module is strictly CLI glue.
///
/// ## How To Use
/// - For command-line users: `trello-backup backup --config backup.yaml`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`trello-backup-core`]: ../../trello-backup-core/
use crate::load_config::{load_config, SinkSection};
use crate::sink::LocalDirSink;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trello_backup_core::backup::{run_backup, BackupOutcome};
use trello_backup_core::client::RateLimitedClient;
use trello_backup_core::fetch::TrelloFetcher;

/// CLI for trello-backup: export a full Trello workspace to CSV.
#[derive(Parser)]
#[clap(
    name = "trello-backup",
    version,
    about = "Export every board, list and card of a Trello workspace to a CSV snapshot"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export the whole workspace once and store the CSV in the configured sink
    Backup {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
///
/// Prints the run outcome as JSON on stdout. A failed run is returned as an
/// error after the outcome has been printed.
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Backup { config } => {
            let config = load_config(config)?;
            tracing::info!(command = "backup", "Starting Trello backup");

            let client = RateLimitedClient::new(&config.trello, config.credentials.clone());
            let source = TrelloFetcher::new(client);
            let outcome = match &config.sink {
                SinkSection::Local { output_dir } => {
                    let sink = LocalDirSink::new(output_dir);
                    run_backup(&source, &sink, chrono::Utc::now()).await
                }
            };

            println!("{}", serde_json::to_string(&outcome)?);
            finish(outcome)
        }
    }
}

fn finish(outcome: BackupOutcome) -> Result<()> {
    if outcome.success {
        tracing::info!(command = "backup", locator = ?outcome.locator, "Backup complete");
        Ok(())
    } else {
        let message = outcome.error.unwrap_or_else(|| "unknown error".to_string());
        tracing::error!(command = "backup", error = %message, "Backup failed");
        Err(anyhow::Error::msg(message))
    }
}
