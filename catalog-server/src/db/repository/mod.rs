//! Repository layer: free functions over `&SqlitePool`.
//!
//! JSON-valued columns (attributes, pricing, media, ...) are stored as TEXT
//! and (de)serialized at the repository boundary.

pub mod product;
pub mod variant;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl From<sqlx::Error> for RepoError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => RepoError::NotFound("Record".to_string()),
            other => RepoError::Database(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(e: serde_json::Error) -> Self {
        RepoError::Serialization(e.to_string())
    }
}
