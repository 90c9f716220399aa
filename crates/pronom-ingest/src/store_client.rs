//! Client for the stats server's upload endpoint

use crate::config::IngestConfig;
use crate::http::{build_client, request_error};
use pronom_common::auth::{digest_secret, AUTH_HEADER};
use pronom_common::{AggregateSummary, PronomError, Result};
use reqwest::Client;
use tracing::info;

pub struct StoreClient {
    client: Client,
    endpoint: String,
    auth_digest: String,
}

impl StoreClient {
    /// Requires `SERVER_ADDR` and `SERVER_AUTH` to be configured
    pub fn from_config(config: &IngestConfig) -> Result<Self> {
        let (addr, secret) = config.store_target()?;
        Ok(Self {
            client: build_client(config)?,
            endpoint: format!("{}/pronom_summary", addr),
            auth_digest: digest_secret(secret),
        })
    }

    /// PUT the aggregate as the newest stored summary
    #[tracing::instrument(skip_all, fields(version = summary.version()))]
    pub async fn store(&self, summary: &AggregateSummary) -> Result<()> {
        let response = self
            .client
            .put(&self.endpoint)
            .header(AUTH_HEADER, &self.auth_digest)
            .json(summary)
            .send()
            .await
            .map_err(|e| request_error(&self.endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PronomError::fetch(format!(
                "error storing PRONOM data: {} returned {}: {}",
                self.endpoint, status, body
            )));
        }

        info!(records = summary.records.len(), "PRONOM data stored");
        Ok(())
    }
}
