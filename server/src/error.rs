//! Error types for the HTTP layer.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bookshelf_catalog::CatalogError;
use bookshelf_search::SearchError;
use thiserror::Error;
use tracing::error;

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Errors that can occur while configuring, starting or serving requests.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Catalog error.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Search error.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Embedding provider setup error.
    #[error("embedding provider error: {0}")]
    Embedding(#[from] bookshelf_embeddings::EmbeddingError),

    /// A request parameter was missing or unusable.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Catalog(CatalogError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Search(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {self}");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
