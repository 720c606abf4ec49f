//! Error types for the embeddings system.

use thiserror::Error;

/// Result type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors raised while generating an embedding.
///
/// Every variant means the same thing to a caller: no vector was produced.
/// The variants only differ in what went wrong on the way.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Nothing to embed.
    #[error("cannot embed empty text")]
    EmptyInput,

    /// The remote service answered with a non-success status.
    #[error("API request failed with status {status}: {body}")]
    ApiRequest { status: u16, body: String },

    /// The model was still loading after the cold-start budget ran out.
    #[error("model not ready after waiting {waited_secs:.1}s")]
    ModelNotReady { waited_secs: f32 },

    /// Invalid response from provider.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// HTTP transport error, including timeouts.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A persisted vector that cannot be turned back into an embedding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedVector {
    /// The text is not a JSON array of numbers.
    #[error("not a numeric array: {0}")]
    Syntax(String),

    /// The array is empty.
    #[error("vector is empty")]
    Empty,

    /// The array has the wrong number of components.
    #[error("expected {expected} components, found {actual}")]
    WrongDimension { expected: usize, actual: usize },

    /// A component is NaN or infinite.
    #[error("component {index} is not finite")]
    NonFinite { index: usize },
}
