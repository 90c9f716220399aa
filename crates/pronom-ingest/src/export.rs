//! Bulk exporter
//!
//! Downloads every record document of the `fmt` and `x-fmt` namespaces from
//! the registry into `<export_dir>/<namespace>/<namespace><id>.xml`.

use crate::config::{IngestConfig, X_FMT_LIMIT};
use crate::http::{build_client, request_error, status_error};
use futures::stream::{self, StreamExt};
use pronom_common::Result;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Exported record documents must begin with this
const XML_PREFIX: &str = "<?xml version=";

/// One record to export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordJob {
    pub namespace: &'static str,
    pub id: u32,
}

impl RecordJob {
    pub fn url(&self, registry_url: &str) -> String {
        format!(
            "{}/{}/{}.xml",
            registry_url.trim_end_matches('/'),
            self.namespace,
            self.id
        )
    }

    pub fn file_name(&self) -> String {
        format!("{}{}.xml", self.namespace, self.id)
    }
}

/// `fmt/1..=fmt_max` followed by `x-fmt/1..=455`
pub fn record_jobs(fmt_max: u32) -> Vec<RecordJob> {
    let fmt = (1..=fmt_max).map(|id| RecordJob { namespace: "fmt", id });
    let x_fmt = (1..=X_FMT_LIMIT).map(|id| RecordJob { namespace: "x-fmt", id });
    fmt.chain(x_fmt).collect()
}

/// Backoff before retry `attempt` (1-based): `2^attempt` seconds, clamped
pub fn backoff_delay(attempt: u32, min_secs: u64, max_secs: u64) -> Duration {
    let secs = 2u64.saturating_pow(attempt).clamp(min_secs, max_secs);
    Duration::from_secs(secs)
}

/// Whether a response body looks like an exported record
pub fn is_record_document(body: &str) -> bool {
    body.starts_with(XML_PREFIX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Written,
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub written: usize,
    pub skipped: usize,
}

pub struct Exporter {
    client: Client,
    config: IngestConfig,
}

impl Exporter {
    pub fn new(config: IngestConfig) -> Result<Self> {
        let client = build_client(&config)?;
        Ok(Self { client, config })
    }

    pub fn with_client(client: Client, config: IngestConfig) -> Self {
        Self { client, config }
    }

    /// Export every record up to `fmt_max`, failing on the first record
    /// that cannot be fetched after all retries.
    #[tracing::instrument(skip(self), fields(export_dir = %self.config.export_dir.display()))]
    pub async fn export(&self, fmt_max: u32) -> Result<ExportStats> {
        for namespace in ["fmt", "x-fmt"] {
            tokio::fs::create_dir_all(self.config.export_dir.join(namespace)).await?;
        }

        let jobs = record_jobs(fmt_max);
        info!(records = jobs.len(), fmt_max, x_fmt_max = X_FMT_LIMIT, "Exporting registry records");

        let mut results = stream::iter(jobs)
            .map(|job| self.export_record(job))
            .buffer_unordered(self.config.concurrency.max(1));

        let mut stats = ExportStats::default();
        while let Some(outcome) = results.next().await {
            match outcome? {
                Outcome::Written => stats.written += 1,
                Outcome::Skipped => stats.skipped += 1,
            }
        }

        info!(written = stats.written, skipped = stats.skipped, "Export complete");
        Ok(stats)
    }

    fn record_path(&self, job: &RecordJob) -> PathBuf {
        self.config.export_dir.join(job.namespace).join(job.file_name())
    }

    async fn export_record(&self, job: RecordJob) -> Result<Outcome> {
        let url = job.url(&self.config.registry_url);
        debug!(%url, "Fetching record");
        let body = self.fetch_with_retry(&url).await?;

        if !is_record_document(&body) {
            let head: String = body.chars().take(XML_PREFIX.len()).collect();
            info!(file = %job.file_name(), head = %head, "Not writing record");
            return Ok(Outcome::Skipped);
        }

        tokio::fs::write(self.record_path(&job), body).await?;
        tokio::time::sleep(self.config.request_delay()).await;
        Ok(Outcome::Written)
    }

    /// GET with retries on transport errors and 5xx responses
    async fn fetch_with_retry(&self, url: &str) -> Result<String> {
        let mut attempt = 1;

        loop {
            let result = match self.client.get(url).send().await {
                Ok(response) if response.status().is_server_error() => {
                    Err(status_error(url, response.status()))
                },
                Ok(response) => response.text().await.map_err(|e| request_error(url, e)),
                Err(e) => Err(request_error(url, e)),
            };

            match result {
                Ok(body) => return Ok(body),
                Err(e) if attempt < self.config.max_retries => {
                    let delay = backoff_delay(
                        attempt,
                        self.config.backoff_min_secs,
                        self.config.backoff_max_secs,
                    );
                    warn!(
                        "Download attempt {}/{} failed: {}; retrying in {:?}",
                        attempt, self.config.max_retries, e, delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                },
                Err(e) => return Err(e),
            }
        }
    }
}
