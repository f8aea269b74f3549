// src/error/types.rs
use crate::domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Crate-level error taxonomy.
///
/// The embedding transport maps these onto protocol responses:
/// `NotFound` -> 404, `Domain` -> 400, `DeleteConflict` -> 409,
/// everything else -> 500. The core never retries or recovers them.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Resource not found")]
    NotFound,

    #[error("Delete conflict: {0}")]
    DeleteConflict(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

impl AppError {
    /// An author still holding books cannot be deleted.
    pub fn author_has_books() -> Self {
        AppError::DeleteConflict("cannot delete an author who still has books".to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
