//! CLI for the pkgfetch conditional downloader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pkgfetch_core::config;
use std::path::PathBuf;

use commands::{run_completions, run_get, run_inspect, run_man};

/// Top-level CLI for pkgfetch.
#[derive(Debug, Parser)]
#[command(name = "pkgfetch")]
#[command(about = "pkgfetch: cache-aware conditional downloader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a URL into the cache, publishing only if it changed.
    Get {
        /// HTTP/HTTPS URL to download.
        url: String,

        /// Destination directory (default: the configured downloads dir).
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,

        /// Filename override (default: the URL's final path segment).
        #[arg(long, value_name = "NAME")]
        filename: Option<String>,

        /// Ignore ETag/Last-Modified; compare Content-Length against the cached size only.
        #[arg(long)]
        check_filesize_only: bool,

        /// Use this local file instead of downloading anything.
        #[arg(long, value_name = "PATH")]
        local_file: Option<PathBuf>,

        /// Print the outcome as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the stored validators and size of a downloaded file.
    Inspect {
        /// Path to a previously downloaded file.
        path: PathBuf,

        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions to stdout.
    Completions {
        /// Shell to generate for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Render the man page to stdout.
    Man,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Get {
                url,
                download_dir,
                filename,
                check_filesize_only,
                local_file,
                json,
            } => run_get(
                &cfg,
                url,
                download_dir,
                filename,
                check_filesize_only,
                local_file,
                json,
            )?,
            CliCommand::Inspect { path, json } => run_inspect(&path, json)?,
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}
