//! Batch summarizer
//!
//! Parses every exported record under a directory in parallel, merges in
//! container-signature coverage and returns the summaries sorted by name.

use crate::container::parse_container;
use crate::record::parse_record;
use futures::stream::{self, StreamExt};
use pronom_common::{PronomError, RecordSummary, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Default fan-out: one blocking parser per available core
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Every regular file below `dir`, recursively
pub fn collect_record_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Set the container flag on every record whose PUID a container signature maps
pub fn merge_container_membership(records: &mut [RecordSummary], container_puids: &[String]) {
    let covered: HashSet<&str> = container_puids.iter().map(String::as_str).collect();
    for record in records.iter_mut() {
        if covered.contains(record.identifier.as_str()) {
            record.mark_container_signature();
        }
    }
}

/// Sort by display name, breaking ties on identifier
pub fn sort_records(records: &mut [RecordSummary]) {
    records.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.identifier.cmp(&b.identifier)));
}

async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| PronomError::Internal(format!("parser task failed: {}", e)))?
}

/// Summarize an export directory against a container-signature file.
///
/// The first document that fails to parse aborts the whole batch.
#[tracing::instrument(skip_all, fields(export_dir = %export_dir.display()))]
pub async fn summarize(
    export_dir: &Path,
    container_path: &Path,
    workers: usize,
) -> Result<Vec<RecordSummary>> {
    let files = collect_record_files(export_dir)?;
    info!(files = files.len(), workers, "Summarizing exported records");

    let container = container_path.to_path_buf();
    let container_puids = run_blocking(move || parse_container(&container)).await?;
    debug!(mappings = container_puids.len(), "Read container signature mappings");

    let mut results = stream::iter(files)
        .map(|path| run_blocking(move || parse_record(&path)))
        .buffer_unordered(workers.max(1));

    let mut records = Vec::new();
    while let Some(record) = results.next().await {
        records.push(record?);
    }

    merge_container_membership(&mut records, &container_puids);
    sort_records(&mut records);

    info!(records = records.len(), "Summary complete");
    Ok(records)
}
