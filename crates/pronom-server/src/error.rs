//! Server-specific error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::response::ErrorResponse;

/// Application error types
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A stored summary no longer deserializes
    #[error("Corrupt summary: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Corrupt(_) => "CORRUPT_SUMMARY",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "A database error occurred".to_string())
            },
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Unauthorized(message) => {
                tracing::warn!("Rejected upload: {}", message);
                (StatusCode::UNAUTHORIZED, message.clone())
            },
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::Corrupt(e) => {
                tracing::error!("Stored summary does not deserialize: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "problem retrieving PRONOM summary".to_string())
            },
            AppError::Internal(message) => {
                tracing::error!("Internal error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message.clone())
            },
        };

        (status, Json(ErrorResponse::new(self.code(), message))).into_response()
    }
}
