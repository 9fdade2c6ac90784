//! Unified error handling
//!
//! [`AppError`] is the application-level error enum; every handler returns
//! [`AppResult`]. Errors render as a JSON body `{"message": ...}` with the
//! status class of the failure:
//!
//! | Variant | Status | Notes |
//! |------------|--------|------------------------------------------|
//! | Validation | 400 | missing identifiers, bad payload fields |
//! | NotFound | 404 | referenced product/variant does not exist |
//! | Storage | 500 | media byte persistence failed, fatal |
//! | Database | 500 | details logged, not leaked |
//! | Internal | 500 | details logged, not leaked |
//!
//! Best-effort failures (media byte deletion, malformed optional JSON
//! fields) are logged where they happen and never become an `AppError`.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::db::repository::RepoError;

/// API error body: `{"message": "..."}`
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing required identifiers or invalid payload fields (400)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Referenced resource does not exist (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Media byte persistence failed (500). Aborts the request, since an
    /// advertised media URL with no bytes behind it is worse than a rejected
    /// write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(String),

    /// Anything else (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, format!("{msg} not found")),
            AppError::Storage(msg) => {
                error!(target: "media", error = %msg, "Media storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Media storage failed".to_string(),
                )
            }
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(what) => AppError::NotFound(what),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => AppError::Database(msg),
            RepoError::Serialization(msg) => AppError::Internal(msg),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Validation(format!("Invalid multipart request: {e}"))
    }
}

/// Result type for handlers and services
pub type AppResult<T> = Result<T, AppError>;
