//! Error types for semantic search.

use bookshelf_catalog::CatalogError;
use bookshelf_embeddings::EmbeddingError;
use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that end a search or backfill call.
///
/// Failures confined to a single book never show up here: search skips the
/// book and backfill records it in its report.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The caller sent an unusable query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The query could not be embedded.
    #[error("embedding generation failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// The catalog could not be read.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SearchError {
    /// True when the caller is at fault rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidQuery(_))
    }
}
