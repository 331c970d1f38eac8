//! CLI for the listup filter list updater.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use listup_core::config::ListupConfig;
use listup_core::records::RecordDb;
use listup_core::store::FsByteStore;
use std::path::PathBuf;

use commands::{run_checksum, run_install, run_remove, run_stage, run_status, run_update_all};

/// Top-level CLI for the listup filter list updater.
#[derive(Debug, Parser)]
#[command(name = "listup")]
#[command(about = "listup: validate, compile and install ad-blocking filter lists", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Stage a downloaded filter list file for a later install.
    Stage {
        /// Filter list identifier.
        id: String,
        /// Path to the downloaded list.
        path: PathBuf,
    },

    /// Validate, compile and install the staged download of a filter list.
    Install {
        /// Filter list identifier.
        id: String,
        /// Stage this file first.
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
        /// Accept lists that have neither a checksum nor a license line.
        #[arg(long)]
        no_license_check: bool,
        /// Print the task outcome as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Install every list that has a staged download.
    UpdateAll {
        /// Accept lists that have neither a checksum nor a license line.
        #[arg(long)]
        no_license_check: bool,
    },

    /// Show installed filter lists.
    Status,

    /// Remove a filter list record and its compiled artifact.
    Remove {
        /// Filter list identifier.
        id: String,
        /// Keep the compiled artifact in the store.
        #[arg(long)]
        keep_artifact: bool,
    },

    /// Show the declared and computed checksum of a list file.
    Checksum {
        /// Path to the list.
        path: PathBuf,
    },
}

impl CliCommand {
    pub async fn run_from_args(cfg: ListupConfig) -> Result<()> {
        let cli = Cli::parse();
        tracing::debug!("loaded config: {:?}", cfg);

        let store = FsByteStore::open(cfg.store_dir()?)?;
        let db = RecordDb::open_default().await?;

        match cli.command {
            CliCommand::Stage { id, path } => run_stage(&store, &id, &path)?,
            CliCommand::Install {
                id,
                file,
                no_license_check,
                json,
            } => {
                run_install(
                    &db,
                    &store,
                    &cfg,
                    &id,
                    file.as_deref(),
                    !no_license_check && cfg.require_license,
                    json,
                )
                .await?
            }
            CliCommand::UpdateAll { no_license_check } => {
                run_update_all(&db, &store, &cfg, !no_license_check && cfg.require_license).await?
            }
            CliCommand::Status => run_status(&db).await?,
            CliCommand::Remove { id, keep_artifact } => {
                run_remove(&db, &store, &id, keep_artifact).await?
            }
            CliCommand::Checksum { path } => run_checksum(&path)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
