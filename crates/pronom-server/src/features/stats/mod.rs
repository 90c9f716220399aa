//! Statistics and reports over the current summary

pub mod html;
pub mod queries;
pub mod routes;

pub use queries::RecordFilter;
pub use routes::stats_routes;
