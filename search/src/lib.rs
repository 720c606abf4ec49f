//! # Semantic Search
//!
//! Ties the catalog to the embedding layer:
//!
//! - **Backfill**: Embed every book that has no stored vector yet
//! - **Search**: Embed a query and rank stored vectors against it
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      SemanticSearch                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  search(q) ──► EmbeddingProvider ──► query vector               │
//! │                                          │                      │
//! │  CatalogStore::list_with_vector ──► VectorCodec::decode         │
//! │                                          │                      │
//! │                                          ▼                      │
//! │                                   rank (cosine, top-k)          │
//! │                                                                 │
//! │  backfill() ──► list_without_vector ──► DescriptionTemplate     │
//! │                     ──► EmbeddingProvider ──► VectorCodec       │
//! │                     ──► CatalogStore::save_vector               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bookshelf_search::{SearchConfig, SemanticSearch};
//!
//! let search = SemanticSearch::new(provider, catalog, SearchConfig::default());
//! let report = search.backfill().await?;
//! let books = search.search("wizards and rings", 5).await?;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod report;
pub mod retry;
pub mod template;

pub use config::{BackfillConfig, SearchConfig};
pub use engine::SemanticSearch;
pub use error::{Result, SearchError};
pub use report::{BackfillFailure, BackfillReport, BookOutcome, FailureKind};
pub use retry::RetryPolicy;
pub use template::DescriptionTemplate;
