//! Summary upload and retrieval

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::summary_routes;
