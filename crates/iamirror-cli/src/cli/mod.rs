use anyhow::Result;
use clap::{Parser, Subcommand};
use iamirror_core::config;
use std::path::PathBuf;

mod commands;

/// Top-level CLI for the iamirror bulk downloader.
#[derive(Debug, Parser)]
#[command(name = "iamirror")]
#[command(about = "Bulk-download and verify Internet Archive items", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Mirror an item: fetch its file manifest and download every file,
    /// skipping files already present and valid.
    Download {
        /// Item URL (e.g. https://archive.org/details/<item>) or any URL
        /// ending in the item identifier.
        url: String,

        /// Number of concurrent download workers.
        #[arg(long)]
        threads: Option<usize>,

        /// Directory to mirror into.
        #[arg(long, default_value = "./")]
        target_dir: PathBuf,
    },

    /// Re-validate an existing mirror against a manifest, without
    /// downloading anything.
    Validate {
        /// Path to the item's _files.xml manifest.
        manifest: PathBuf,

        /// Directory holding the mirrored files.
        #[arg(long, default_value = ".")]
        directory: PathBuf,

        /// Number of concurrent validation workers.
        #[arg(long)]
        threads: Option<usize>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Download {
                url,
                threads,
                target_dir,
            } => commands::run_download(&cfg, &url, threads, &target_dir),
            CliCommand::Validate {
                manifest,
                directory,
                threads,
            } => commands::run_validate(&cfg, &manifest, &directory, threads),
        }
    }
}
