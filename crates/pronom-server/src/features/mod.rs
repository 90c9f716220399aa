//! Feature modules implementing the stats API
//!
//! # Features
//!
//! - **summary**: upload and retrieval of the current summary
//! - **stats**: counts, reports and htmx fragments derived from it
//!
//! Each feature is a vertical slice with its own `routes.rs`; handlers
//! delegate to plain functions over [`SummaryStore`] so they can be tested
//! without HTTP.

pub mod shared;
pub mod stats;
pub mod summary;

use axum::Router;
use std::sync::Arc;

use crate::store::SummaryStore;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// Summary table backed by SQLite
    pub store: SummaryStore,
    /// Secret whose digest must accompany uploads
    pub server_auth: Arc<str>,
}

impl FeatureState {
    pub fn new(store: SummaryStore, server_auth: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            server_auth: server_auth.into(),
        }
    }
}

/// Creates the router with all feature routes mounted at the root
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .merge(summary::summary_routes())
        .merge(stats::stats_routes())
        .with_state(state)
}
