//! PRONOM Stats Server Library
//!
//! HTTP API publishing statistics about the current PRONOM release.
//!
//! # Overview
//!
//! - **Upload**: `PUT /pronom_summary` appends a summary produced by
//!   `pronom-tools`, authorized by a shared-secret digest
//! - **Reports**: counts, record lists, CSV and htmx fragments computed
//!   from the most recently stored summary
//! - **Storage**: one append-only SQLite table via SQLx ([`store`])
//! - **Middleware**: CORS and request tracing ([`middleware`])
//!
//! # Example
//!
//! ```no_run
//! use pronom_server::{app, config::Config, store::SummaryStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let store = SummaryStore::connect(&config.database).await?;
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:26000").await?;
//!     axum::serve(listener, app(store, &config)).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod features;
pub mod middleware;
pub mod store;

pub use error::AppError;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::compression::CompressionLayer;

use crate::config::Config;
use crate::features::FeatureState;
use crate::store::SummaryStore;

/// Build the application router with all routes and middleware
pub fn app(store: SummaryStore, config: &Config) -> Router {
    let state = FeatureState::new(store.clone(), config.server_auth.as_str());

    Router::new()
        .route("/health", get(health_check))
        .with_state(store)
        .merge(features::router(state))
        // Apply layers from innermost to outermost
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

/// Health check handler
async fn health_check(State(store): State<SummaryStore>) -> Result<Json<Value>, StatusCode> {
    match store.ping().await {
        Ok(()) => Ok(Json(json!({
            "status": "healthy",
            "database": "connected"
        }))),
        Err(e) => {
            tracing::error!("Database health check failed: {:?}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        },
    }
}
