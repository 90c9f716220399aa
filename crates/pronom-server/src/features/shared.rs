//! Helpers shared by the feature slices

use pronom_common::RecordSummary;
use serde::Deserialize;

use crate::error::AppError;
use crate::store::{StoredSummary, SummaryStore};

/// Base URL of the public registry pages
pub const PRONOM_URL: &str = "https://www.nationalarchives.gov.uk/PRONOM/";

/// The parts of a stored summary the reports read.
///
/// Uploads are stored verbatim, so everything is optional here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryView {
    #[serde(default)]
    pub signature_file_url: Option<String>,
    #[serde(default)]
    pub container_signature_url: Option<String>,
    #[serde(default)]
    pub records: Vec<RecordSummary>,
}

/// Latest stored row, or 404 when nothing was uploaded yet
pub async fn current_row(store: &SummaryStore) -> Result<StoredSummary, AppError> {
    store
        .latest()
        .await?
        .ok_or_else(|| AppError::NotFound("no PRONOM summary has been stored".to_string()))
}

/// Latest stored summary, deserialized for reporting
pub async fn current_view(store: &SummaryStore) -> Result<SummaryView, AppError> {
    let row = current_row(store).await?;
    Ok(serde_json::from_str(&row.summary)?)
}

/// Escape text for inclusion in an HTML fragment
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&#39;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
