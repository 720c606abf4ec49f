//! # Embeddings
//!
//! Vector plumbing for bookshelf's semantic search.
//!
//! ## Features
//!
//! - **Vector Codec**: Persist embeddings as text and validate them on the way back
//! - **Embedding Providers**: Turn text into vectors through a remote model
//! - **Similarity Ranking**: Cosine similarity and top-k ranking by linear scan
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings                                   │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider ──► Embedding ──► VectorCodec               │
//! │       │                    │              │                     │
//! │       ▼                    ▼              ▼                     │
//! │  HuggingFace         cosine / rank   EncodedVector             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod codec;
pub mod error;
pub mod provider;
pub mod similarity;

pub use codec::{EncodedVector, VectorCodec};
pub use error::{EmbeddingError, MalformedVector, Result};
pub use provider::{EmbeddingProvider, HuggingFaceConfig, HuggingFaceProvider};
pub use similarity::{SimilarityResult, cosine_similarity, rank};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Dimension of embeddings produced by all-MiniLM-L6-v2.
pub const DEFAULT_DIMENSION: usize = 384;
