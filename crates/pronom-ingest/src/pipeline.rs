//! Summary pipeline
//!
//! Glues monitor, exporter, summarizer, and store client together:
//!
//! ```text
//! release feed -> export records -> download container file -> summarize -> PUT to stats server
//! ```

use crate::config::IngestConfig;
use crate::export::Exporter;
use crate::http::build_client;
use crate::monitor::ReleaseMonitor;
use crate::store_client::StoreClient;
use crate::summary::summarize;
use pronom_common::{AggregateSummary, PronomError, ReleaseSummary, Result};
use tracing::info;

/// What a scheduled run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CronOutcome {
    /// A summary for this version was stored
    Stored(String),
    /// The feed did not change today
    NoRelease,
}

pub struct Pipeline {
    config: IngestConfig,
    monitor: ReleaseMonitor,
    exporter: Exporter,
}

impl Pipeline {
    pub fn new(config: IngestConfig) -> Result<Self> {
        let client = build_client(&config)?;
        Ok(Self {
            monitor: ReleaseMonitor::with_client(client.clone(), config.clone()),
            exporter: Exporter::with_client(client, config.clone()),
            config,
        })
    }

    pub fn monitor(&self) -> &ReleaseMonitor {
        &self.monitor
    }

    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    /// Build the aggregate summary for the newest release.
    ///
    /// Records are exported first when the export directory is missing or
    /// `clean` is set; a clean run removes the previous export.
    #[tracing::instrument(skip(self))]
    pub async fn get_summary(&self, clean: bool) -> Result<AggregateSummary> {
        let release = self.monitor.check_existing().await?;
        self.summarize_release(release, clean).await
    }

    async fn summarize_release(
        &self,
        release: ReleaseSummary,
        clean: bool,
    ) -> Result<AggregateSummary> {
        let fmt_max = release.latest_fmt_number().ok_or_else(|| {
            PronomError::missing_field(release.release_notes_url(), "latest fmt identifier")
        })?;

        let export_dir = &self.config.export_dir;
        let exists = tokio::fs::try_exists(export_dir).await?;
        if clean && exists {
            info!(dir = %export_dir.display(), "Removing previous export");
            tokio::fs::remove_dir_all(export_dir).await?;
        }
        if clean || !exists {
            self.exporter.export(fmt_max).await?;
        }

        let container = self.monitor.download_container(&release).await?;
        let records = summarize(export_dir, &container, self.config.concurrency).await?;

        Ok(AggregateSummary::new(release, records))
    }

    /// Build the summary and upload it to the stats server
    pub async fn store_summary(&self, clean: bool) -> Result<AggregateSummary> {
        let store = StoreClient::from_config(&self.config)?;
        let summary = self.get_summary(clean).await?;
        store.store(&summary).await?;
        Ok(summary)
    }

    /// Scheduled run: with `init`, always rebuild and store; otherwise only
    /// when a release was published today.
    #[tracing::instrument(skip(self))]
    pub async fn cron(&self, init: bool) -> Result<CronOutcome> {
        let store = StoreClient::from_config(&self.config)?;

        let release = if init {
            info!("Initializing stats database");
            self.monitor.check_existing().await?
        } else {
            match self.monitor.check_for_release().await? {
                Some(release) => release,
                None => return Ok(CronOutcome::NoRelease),
            }
        };

        let summary = self.summarize_release(release, true).await?;
        store.store(&summary).await?;
        Ok(CronOutcome::Stored(summary.version().to_string()))
    }
}
