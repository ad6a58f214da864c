//! Error types for the store crate.

use thiserror::Error;

/// Errors returned by the sales store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database driver reported a failure.
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    /// Caller-supplied input was rejected before reaching the database.
    #[error("{field}: {reason}")]
    Validation { field: String, reason: String },

    /// A referenced row does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// A stored value could not be shaped into the response.
    #[error("{0}")]
    Decode(String),
}

impl StoreError {
    pub fn missing_field(field: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            reason: "missing required field".to_string(),
        }
    }

    pub fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors raised by the database driver.
    pub fn is_database(&self) -> bool {
        matches!(self, Self::Database(_))
    }
}
