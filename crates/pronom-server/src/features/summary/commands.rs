//! Summary upload

use pronom_common::auth::verify_digest;
use serde_json::Value;

use crate::error::AppError;
use crate::store::SummaryStore;

/// Check the presented digest, validate the body and append it.
///
/// Returns the version label that was stored.
#[tracing::instrument(skip_all)]
pub async fn store_summary(
    store: &SummaryStore,
    server_auth: &str,
    presented: Option<&str>,
    body: &[u8],
) -> Result<String, AppError> {
    match presented {
        Some(digest) if verify_digest(server_auth, digest) => {},
        _ => return Err(AppError::Unauthorized("incorrect auth token".to_string())),
    }

    let (version, summary) = parse_upload(body)?;
    let id = store.insert(&version, &summary).await?;

    tracing::info!(%version, id, "PRONOM summary stored");
    Ok(version)
}

/// Body must be a JSON object carrying a string `version`
pub fn parse_upload(body: &[u8]) -> Result<(String, String), AppError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("summary is not valid JSON: {}", e)))?;

    let version = value
        .get("version")
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest("summary has no version".to_string()))?
        .to_string();

    Ok((version, value.to_string()))
}
