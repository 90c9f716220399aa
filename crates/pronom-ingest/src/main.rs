//! PRONOM Tools - release tracking and summary tool

use anyhow::Result;
use clap::Parser;
use pronom_common::logging::{init_logging, LogConfig, LogLevel};
use pronom_ingest::config::IngestConfig;
use pronom_ingest::export::Exporter;
use pronom_ingest::pipeline::{CronOutcome, Pipeline};
use pronom_ingest::{Cli, Commands};
use std::process;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    };

    let defaults = LogConfig::builder()
        .level(log_level)
        .log_file_prefix("pronom-tools")
        .build();

    // Environment variables take precedence
    let log_config = LogConfig::from_env_with(defaults.clone()).unwrap_or(defaults);
    let guard = match init_logging(&log_config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Failed to initialize logging: {:#}", e);
            None
        },
    };

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Command failed");
            1
        },
    };

    drop(guard);
    process::exit(code);
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli) -> Result<i32> {
    let mut config = IngestConfig::load()?;
    if let Some(dir) = cli.export_dir {
        config.export_dir = dir;
    }

    let pipeline = Pipeline::new(config.clone())?;

    match cli.command {
        Commands::NewRelease => match pipeline.monitor().check_for_release().await? {
            Some(release) => print_json(&release)?,
            None => return Ok(1),
        },
        Commands::CheckExisting => {
            let release = pipeline.monitor().check_existing().await?;
            print_json(&release)?;
        },
        Commands::Summary { clean } => {
            let summary = pipeline.get_summary(clean).await?;
            print_json(&summary)?;
        },
        Commands::Store { clean } => {
            pipeline.store_summary(clean).await?;
        },
        Commands::DownloadContainer => {
            let release = pipeline.monitor().check_existing().await?;
            let path = pipeline.monitor().download_container(&release).await?;
            println!("container signature output to: {}", path.display());
        },
        Commands::DownloadSignature => {
            let release = pipeline.monitor().check_existing().await?;
            let path = pipeline.monitor().download_signature_file(&release).await?;
            println!("standard signature output to: {}", path.display());
        },
        Commands::Export { fmt_range } => {
            let started = std::time::Instant::now();
            Exporter::new(config)?.export(fmt_range).await?;
            info!(elapsed = ?started.elapsed(), "Export finished");
        },
        Commands::Cron { init } => match pipeline.cron(init).await? {
            CronOutcome::Stored(version) => info!(%version, "Stats server updated"),
            CronOutcome::NoRelease => info!("No new release"),
        },
    }

    Ok(0)
}
