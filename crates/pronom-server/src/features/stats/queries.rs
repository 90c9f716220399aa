//! Record selections behind the count and report endpoints

use pronom_common::{DescriptionStatus, RecordSummary};
use serde::Serialize;

use crate::error::AppError;
use crate::features::shared::current_view;
use crate::store::SummaryStore;

/// Which records a statistic counts.
///
/// Deprecated records are excluded from every selection except
/// [`RecordFilter::All`] and [`RecordFilter::Deprecated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFilter {
    All,
    Complete,
    /// Neither complete nor deprecated
    Incomplete,
    /// Identifiable by a standard or container signature
    Identified,
    /// Not identifiable by any signature yet
    RequiresSignature,
    Deprecated,
}

impl RecordFilter {
    pub fn matches(self, record: &RecordSummary) -> bool {
        match self {
            RecordFilter::All => true,
            RecordFilter::Complete => record.description == DescriptionStatus::Complete,
            RecordFilter::Incomplete => record.is_incomplete(),
            RecordFilter::Identified => !record.is_deprecated() && record.has_identification(),
            RecordFilter::RequiresSignature => {
                !record.is_deprecated() && !record.has_identification()
            },
            RecordFilter::Deprecated => record.is_deprecated(),
        }
    }

    pub fn select(self, records: &[RecordSummary]) -> Vec<&RecordSummary> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    pub fn count(self, records: &[RecordSummary]) -> usize {
        records.iter().filter(|r| self.matches(r)).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureFiles {
    #[serde(rename = "standard signature")]
    pub standard: Option<String>,
    #[serde(rename = "container signature")]
    pub container: Option<String>,
}

pub async fn count_records(store: &SummaryStore, filter: RecordFilter) -> Result<usize, AppError> {
    let view = current_view(store).await?;
    Ok(filter.count(&view.records))
}

pub async fn list_records(
    store: &SummaryStore,
    filter: RecordFilter,
) -> Result<Vec<RecordSummary>, AppError> {
    let view = current_view(store).await?;
    Ok(view.records.into_iter().filter(|r| filter.matches(r)).collect())
}

pub async fn signature_files(store: &SummaryStore) -> Result<SignatureFiles, AppError> {
    let view = current_view(store).await?;
    Ok(SignatureFiles {
        standard: view.signature_file_url,
        container: view.container_signature_url,
    })
}
