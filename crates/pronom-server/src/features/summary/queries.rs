//! Summary retrieval

use serde::Serialize;
use serde_json::Value;

use crate::error::AppError;
use crate::features::shared::{current_row, current_view};
use crate::store::SummaryStore;

/// Column order of the CSV report
pub const CSV_HEADERS: [&str; 5] = [
    "name",
    "description",
    "signature",
    "identifier",
    "container_signature",
];

#[derive(Debug, Serialize)]
pub struct LatestSummary {
    pub version: String,
    pub summary: Value,
}

pub async fn latest_summary(store: &SummaryStore) -> Result<LatestSummary, AppError> {
    let row = current_row(store).await?;
    Ok(LatestSummary {
        summary: serde_json::from_str(&row.summary)?,
        version: row.version,
    })
}

pub async fn latest_version(store: &SummaryStore) -> Result<String, AppError> {
    Ok(current_row(store).await?.version)
}

/// One line per record; `container_signature` is empty unless set
pub async fn summary_csv(store: &SummaryStore) -> Result<String, AppError> {
    let view = current_view(store).await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    let csv_error = |e: csv::Error| AppError::Internal(format!("cannot write CSV: {}", e));

    writer.write_record(CSV_HEADERS).map_err(csv_error)?;
    for record in &view.records {
        let container = if record.has_container_signature() { "true" } else { "" };
        writer
            .write_record([
                record.name.as_str(),
                record.description.as_str(),
                if record.signature { "true" } else { "false" },
                record.identifier.as_str(),
                container,
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("cannot write CSV: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(e.to_string()))
}
