//! Shared HTTP plumbing for talking to the registry

use crate::config::IngestConfig;
use crate::release::parse_http_date;
use chrono::NaiveDateTime;
use pronom_common::{PronomError, Result};
use reqwest::header::LAST_MODIFIED;
use reqwest::{Client, StatusCode};

pub const USER_AGENT: &str = concat!("pronom-tools/", env!("CARGO_PKG_VERSION"));

/// Client with the configured timeout and our user agent
pub fn build_client(config: &IngestConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.http_timeout())
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| PronomError::fetch(format!("cannot build HTTP client: {}", e)))
}

pub(crate) fn request_error(url: &str, err: reqwest::Error) -> PronomError {
    PronomError::fetch(format!("{}: {}", url, err))
}

pub(crate) fn status_error(url: &str, status: StatusCode) -> PronomError {
    PronomError::fetch(format!("{}: unexpected status {}", url, status))
}

/// HEAD `url` and parse its `Last-Modified` header
pub async fn last_modified(client: &Client, url: &str) -> Result<NaiveDateTime> {
    let response = client
        .head(url)
        .send()
        .await
        .map_err(|e| request_error(url, e))?;

    if response.status() != StatusCode::OK {
        return Err(status_error(url, response.status()));
    }

    let header = response
        .headers()
        .get(LAST_MODIFIED)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| PronomError::missing_field(url, "Last-Modified header"))?;

    parse_http_date(header)
}

/// GET `url` as text, failing on any non-success status
pub async fn get_text(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| request_error(url, e))?;

    if !response.status().is_success() {
        return Err(status_error(url, response.status()));
    }

    response.text().await.map_err(|e| request_error(url, e))
}
