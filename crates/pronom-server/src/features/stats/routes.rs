//! Statistics API routes
//!
//! Counts return a bare JSON number, reports a JSON array of records and
//! the `_hx` variants an HTML fragment.

use axum::{extract::State, response::Html, routing::get, Json, Router};
use pronom_common::RecordSummary;

use super::{html, queries, RecordFilter};
use crate::error::AppError;
use crate::features::FeatureState;

pub fn stats_routes() -> Router<FeatureState> {
    Router::new()
        .route("/records_count", count(RecordFilter::All))
        .route("/complete_description_count", count(RecordFilter::Complete))
        .route("/incomplete_description_count", count(RecordFilter::Incomplete))
        .route("/signature_count", count(RecordFilter::Identified))
        .route("/requires_signature_count", count(RecordFilter::RequiresSignature))
        .route("/get_deprecated_count", count(RecordFilter::Deprecated))
        .route("/incomplete_descriptions", list(RecordFilter::Incomplete))
        .route("/requires_signatures", list(RecordFilter::RequiresSignature))
        .route("/get_deprecated", list(RecordFilter::Deprecated))
        .route("/incomplete_descriptions_hx", list_hx(RecordFilter::Incomplete))
        .route("/requires_signatures_hx", list_hx(RecordFilter::RequiresSignature))
        .route("/get_deprecated_hx", list_hx(RecordFilter::Deprecated))
        .route("/signature_files", get(get_signature_files))
        .route("/signature_files_hx", get(get_signature_files_hx))
}

fn count(filter: RecordFilter) -> axum::routing::MethodRouter<FeatureState> {
    get(move |state: State<FeatureState>| count_records(state, filter))
}

fn list(filter: RecordFilter) -> axum::routing::MethodRouter<FeatureState> {
    get(move |state: State<FeatureState>| list_records(state, filter))
}

fn list_hx(filter: RecordFilter) -> axum::routing::MethodRouter<FeatureState> {
    get(move |state: State<FeatureState>| list_records_hx(state, filter))
}

#[tracing::instrument(skip(state))]
async fn count_records(
    State(state): State<FeatureState>,
    filter: RecordFilter,
) -> Result<Json<usize>, AppError> {
    Ok(Json(queries::count_records(&state.store, filter).await?))
}

#[tracing::instrument(skip(state))]
async fn list_records(
    State(state): State<FeatureState>,
    filter: RecordFilter,
) -> Result<Json<Vec<RecordSummary>>, AppError> {
    let records = queries::list_records(&state.store, filter).await?;
    tracing::debug!(count = records.len(), "Report built");
    Ok(Json(records))
}

#[tracing::instrument(skip(state))]
async fn list_records_hx(
    State(state): State<FeatureState>,
    filter: RecordFilter,
) -> Result<Html<String>, AppError> {
    let records = queries::list_records(&state.store, filter).await?;
    Ok(Html(html::record_list(&records)))
}

#[tracing::instrument(skip(state))]
async fn get_signature_files(
    State(state): State<FeatureState>,
) -> Result<Json<queries::SignatureFiles>, AppError> {
    Ok(Json(queries::signature_files(&state.store).await?))
}

#[tracing::instrument(skip(state))]
async fn get_signature_files_hx(
    State(state): State<FeatureState>,
) -> Result<Html<String>, AppError> {
    let files = queries::signature_files(&state.store).await?;
    Ok(Html(html::signature_files(&files)))
}
