//! Error types for the catalog.

use thiserror::Error;

use crate::book::BookId;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that can occur in the catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No book with this id.
    #[error("book not found: {0}")]
    NotFound(BookId),

    /// A draft broke a field constraint.
    #[error("invalid book: {0}")]
    Validation(String),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
