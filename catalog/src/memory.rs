//! In-memory catalog.

use async_trait::async_trait;
use bookshelf_embeddings::EncodedVector;
use tokio::sync::RwLock;
use tracing::debug;

use crate::book::{Book, BookDraft, BookId, StalePolicy};
use crate::error::Result;
use crate::store::{CatalogStore, Shelf};

/// A catalog that lives only as long as the process.
pub struct InMemoryCatalog {
    shelf: RwLock<Shelf>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::with_stale_policy(StalePolicy::default())
    }

    pub fn with_stale_policy(policy: StalePolicy) -> Self {
        Self {
            shelf: RwLock::new(Shelf::new(policy)),
        }
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn list_all(&self) -> Result<Vec<Book>> {
        Ok(self.shelf.read().await.filtered(|_| true))
    }

    async fn list_without_vector(&self) -> Result<Vec<Book>> {
        Ok(self
            .shelf
            .read()
            .await
            .filtered(|b| !b.embedding.is_present()))
    }

    async fn list_with_vector(&self) -> Result<Vec<Book>> {
        Ok(self
            .shelf
            .read()
            .await
            .filtered(|b| b.embedding.is_present()))
    }

    async fn get(&self, id: BookId) -> Result<Book> {
        self.shelf.read().await.get(id)
    }

    async fn create(&self, draft: BookDraft) -> Result<Book> {
        let book = self.shelf.write().await.create(draft)?;
        debug!("Created book {}", book.id);
        Ok(book)
    }

    async fn update(&self, id: BookId, draft: BookDraft) -> Result<Book> {
        self.shelf.write().await.update(id, draft)
    }

    async fn delete(&self, id: BookId) -> Result<()> {
        self.shelf.write().await.delete(id)?;
        debug!("Deleted book {id}");
        Ok(())
    }

    async fn save_vector(&self, id: BookId, vector: EncodedVector) -> Result<()> {
        self.shelf.write().await.save_vector(id, vector)
    }
}
