//! # Catalog
//!
//! Book records and the [`CatalogStore`] capability the search layer is
//! written against.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bookshelf_catalog::{BookDraft, CatalogStore, JsonFileCatalog, StalePolicy};
//!
//! let catalog = JsonFileCatalog::open("data/catalog.json", StalePolicy::Keep).await?;
//! let book = catalog.create(BookDraft::new("Dune", "Frank Herbert", 412)).await?;
//! assert!(!book.embedding.is_present());
//! ```

pub mod book;
pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use book::{Book, BookDraft, BookId, EmbeddingSlot, StalePolicy};
pub use error::{CatalogError, Result};
pub use file::JsonFileCatalog;
pub use memory::InMemoryCatalog;
pub use store::CatalogStore;
