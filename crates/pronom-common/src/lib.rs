//! PRONOM Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the PRONOM tools.
//!
//! # Overview
//!
//! This crate provides functionality used by both the ingest CLI and the
//! stats server:
//!
//! - **Error Handling**: [`PronomError`] and the crate [`Result`] alias
//! - **Types**: record, release, and aggregate summaries
//! - **Auth**: the shared-secret digest used by the upload endpoint
//! - **Logging**: tracing subscriber setup driven by environment variables
//!
//! # Example
//!
//! ```no_run
//! use pronom_common::auth::digest_secret;
//! use pronom_common::types::AggregateSummary;
//!
//! fn upload_headers(secret: &str, summary: &AggregateSummary) -> (String, String) {
//!     (digest_secret(secret), summary.version().to_string())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{PronomError, Result};
pub use types::{AggregateSummary, DescriptionStatus, RecordSummary, ReleaseSummary};
