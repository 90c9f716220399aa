//! Release-note monitor
//!
//! Watches the registry's release-notes feed and resolves the signature
//! files belonging to the newest release.

use crate::config::IngestConfig;
use crate::http::{build_client, get_text, last_modified};
use crate::release::parse_release_xml;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use pronom_common::{PronomError, ReleaseSummary, Result};
use reqwest::Client;
use std::path::PathBuf;
use tracing::{debug, info};

/// Polls the release feed and fetches signature files
pub struct ReleaseMonitor {
    client: Client,
    config: IngestConfig,
}

impl ReleaseMonitor {
    pub fn new(config: IngestConfig) -> Result<Self> {
        let client = build_client(&config)?;
        Ok(Self { client, config })
    }

    /// Reuse an existing client, e.g. one shared with the exporter
    pub fn with_client(client: Client, config: IngestConfig) -> Self {
        Self { client, config }
    }

    /// HEAD the feed; returns whether it changed today (UTC) and when
    #[tracing::instrument(skip(self))]
    pub async fn check_release_headers(&self) -> Result<(bool, NaiveDateTime)> {
        let modified = last_modified(&self.client, &self.config.release_notes_url).await?;
        let today = Utc::now().date_naive();
        debug!(%modified, %today, "Release feed headers");
        Ok((modified.date() == today, modified))
    }

    /// The newest release when the feed was updated today, else `None`
    pub async fn check_for_release(&self) -> Result<Option<ReleaseSummary>> {
        let (is_today, modified) = self.check_release_headers().await?;
        if !is_today {
            info!(
                last_updated = %modified.date(),
                "Release feed last updated is not today, skipping release check"
            );
            return Ok(None);
        }

        self.check_existing().await.map(Some)
    }

    /// The newest release in the feed, regardless of when it was published
    #[tracing::instrument(skip(self))]
    pub async fn check_existing(&self) -> Result<ReleaseSummary> {
        let url = &self.config.release_notes_url;
        let xml = get_text(&self.client, url).await?;
        let mut release = parse_release_xml(&xml, url)?;

        let container_date = self.container_date().await?;
        release.derive_signature_file_url(&self.config.cdn_base);
        release.derive_container_signature_url(&self.config.cdn_base, container_date);

        info!(
            version = release.version(),
            date = %release.date(),
            latest = release.latest_identifier(),
            "Found release"
        );
        Ok(release)
    }

    /// Date the container feed was last modified; names the container file
    pub async fn container_date(&self) -> Result<NaiveDate> {
        let modified = last_modified(&self.client, &self.config.container_url).await?;
        Ok(modified.date())
    }

    /// Download the release's container signature file
    pub async fn download_container(&self, release: &ReleaseSummary) -> Result<PathBuf> {
        let name = release
            .container_signature_file_name()
            .ok_or_else(|| PronomError::missing_field(release.version(), "container signature URL"))?;
        self.download(release.container_signature_url(), name).await
    }

    /// Download the release's standard signature file
    pub async fn download_signature_file(&self, release: &ReleaseSummary) -> Result<PathBuf> {
        let name = release
            .signature_file_name()
            .ok_or_else(|| PronomError::missing_field(release.version(), "signature file URL"))?;
        self.download(release.signature_file_url(), name).await
    }

    async fn download(&self, url: &str, file_name: &str) -> Result<PathBuf> {
        let body = get_text(&self.client, url).await?;

        tokio::fs::create_dir_all(&self.config.download_dir).await?;
        let path = self.config.download_dir.join(file_name);
        tokio::fs::write(&path, body).await?;

        info!(url, path = %path.display(), "Downloaded signature file");
        Ok(path)
    }
}
