//! Summary API routes
//!
//! - `PUT /pronom_summary` - Store a new summary (requires the `auth` header)
//! - `GET /pronom_summary` - Latest version and summary
//! - `GET /pronom_summary_csv` - Latest records as CSV
//! - `GET /pronom_version` - Latest version as escaped HTML text

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use pronom_common::auth::AUTH_HEADER;

use super::{commands, queries};
use crate::api::response::MessageResponse;
use crate::error::AppError;
use crate::features::shared::escape_html;
use crate::features::FeatureState;

pub fn summary_routes() -> Router<FeatureState> {
    Router::new()
        .route("/pronom_summary", get(get_summary).put(put_summary))
        .route("/pronom_summary_csv", get(get_summary_csv))
        .route("/pronom_version", get(get_version))
}

#[tracing::instrument(skip_all)]
async fn put_summary(
    State(state): State<FeatureState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    let presented = headers.get(AUTH_HEADER).and_then(|v| v.to_str().ok());
    commands::store_summary(&state.store, &state.server_auth, presented, &body).await?;
    Ok(Json(MessageResponse::success()))
}

#[tracing::instrument(skip(state))]
async fn get_summary(
    State(state): State<FeatureState>,
) -> Result<Json<queries::LatestSummary>, AppError> {
    Ok(Json(queries::latest_summary(&state.store).await?))
}

#[tracing::instrument(skip(state))]
async fn get_summary_csv(State(state): State<FeatureState>) -> Result<impl IntoResponse, AppError> {
    let csv = queries::summary_csv(&state.store).await?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], csv))
}

#[tracing::instrument(skip(state))]
async fn get_version(State(state): State<FeatureState>) -> Result<Html<String>, AppError> {
    Ok(Html(escape_html(&queries::latest_version(&state.store).await?)))
}
