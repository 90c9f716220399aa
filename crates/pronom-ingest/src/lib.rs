//! PRONOM Ingest Library
//!
//! Tools for tracking PRONOM registry releases and summarizing their records.
//!
//! # Overview
//!
//! - **Parsing**: record documents ([`record`]), container-signature files
//!   ([`container`]) and the release-notes feed ([`release`])
//! - **Summarizing**: parallel batch summaries of an export ([`summary`])
//! - **Fetching**: release monitoring ([`monitor`]) and bulk record export
//!   ([`export`])
//! - **Publishing**: upload to the stats server ([`store_client`])
//! - **Pipeline**: the end-to-end run behind `pronom-tools` ([`pipeline`])
//!
//! # Example
//!
//! ```no_run
//! use pronom_ingest::{config::IngestConfig, pipeline::Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pipeline = Pipeline::new(IngestConfig::load()?)?;
//!     let summary = pipeline.get_summary(false).await?;
//!     println!("{} records in {}", summary.records.len(), summary.version());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod container;
pub mod export;
pub mod http;
pub mod monitor;
pub mod pipeline;
pub mod record;
pub mod release;
pub mod store_client;
pub mod summary;
pub mod xml;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// PRONOM tools - helpers for PRONOM releases
#[derive(Parser, Debug)]
#[command(name = "pronom-tools")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "for more information visit https://ffdev.info/")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory for exported PRONOM records
    #[arg(long, env = "PRONOM_EXPORT_DIR", global = true)]
    pub export_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether there was a new PRONOM release today (exit 1 if not)
    NewRelease,

    /// Return information about the existing PRONOM release
    CheckExisting,

    /// Summarize existing PRONOM data
    Summary {
        /// Delete and re-download the record export first
        #[arg(short, long)]
        clean: bool,
    },

    /// Summarize and store the PRONOM summary on the stats server
    Store {
        /// Delete and re-download the record export first
        #[arg(short, long)]
        clean: bool,
    },

    /// Download the container signature file
    DownloadContainer,

    /// Download the standard signature file
    DownloadSignature,

    /// Export PRONOM XML records
    Export {
        /// Current maximum fmt record number (x-fmt is constant at 455)
        #[arg(short, long)]
        fmt_range: u32,
    },

    /// Check for a release and update the stats server
    Cron {
        /// Initialize the stats database (only needed on first run)
        #[arg(short, long)]
        init: bool,
    },
}
