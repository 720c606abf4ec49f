//! JSON file catalog.
//!
//! The whole catalog is one JSON document. It is read once when the store is
//! opened and rewritten after every mutation. Writes go to a temp file that
//! is renamed over the original, so a crash mid-write leaves the previous
//! version intact.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bookshelf_embeddings::EncodedVector;
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::book::{Book, BookDraft, BookId, StalePolicy};
use crate::error::{CatalogError, Result};
use crate::store::{CatalogStore, Shelf};

/// Persistent catalog backed by a single JSON file.
pub struct JsonFileCatalog {
    /// Location of the catalog document.
    path: PathBuf,

    /// Last state successfully written to disk.
    shelf: RwLock<Shelf>,
}

impl JsonFileCatalog {
    /// Open the catalog at `path`, creating an empty one if it doesn't exist.
    pub async fn open(path: impl AsRef<Path>, stale_policy: StalePolicy) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                CatalogError::Storage(format!("{}: {e}", parent.display()))
            })?;
        }

        let shelf = if fs::try_exists(&path).await? {
            let content = fs::read_to_string(&path)
                .await
                .map_err(|e| CatalogError::Storage(format!("{}: {e}", path.display())))?;
            let shelf: Shelf = serde_json::from_str(&content)?;
            info!("Loaded {} books from {}", shelf.len(), path.display());
            shelf.with_policy(stale_policy)
        } else {
            info!("Creating new catalog at {}", path.display());
            let shelf = Shelf::new(stale_policy);
            write_document(&path, &shelf).await?;
            shelf
        };

        Ok(Self {
            path,
            shelf: RwLock::new(shelf),
        })
    }

    /// Apply `op` to a copy of the catalog, persist the copy, then publish it.
    ///
    /// A failed write leaves the in-memory state untouched.
    async fn mutate<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&mut Shelf) -> Result<T> + Send,
        T: Send,
    {
        let mut shelf = self.shelf.write().await;
        let mut next = shelf.clone();
        let out = op(&mut next)?;
        write_document(&self.path, &next).await?;
        *shelf = next;
        Ok(out)
    }
}

async fn write_document(path: &Path, shelf: &Shelf) -> Result<()> {
    let content = serde_json::to_string_pretty(shelf)?;

    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, &content)
        .await
        .map_err(|e| CatalogError::Storage(format!("{}: {e}", temp_path.display())))?;

    fs::rename(&temp_path, path)
        .await
        .map_err(|e| CatalogError::Storage(format!("{}: {e}", path.display())))?;

    debug!("Saved catalog with {} books", shelf.len());
    Ok(())
}

#[async_trait]
impl CatalogStore for JsonFileCatalog {
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
        self.mutate(|shelf| shelf.create(draft)).await
    }

    async fn update(&self, id: BookId, draft: BookDraft) -> Result<Book> {
        self.mutate(|shelf| shelf.update(id, draft)).await
    }

    async fn delete(&self, id: BookId) -> Result<()> {
        self.mutate(|shelf| shelf.delete(id)).await?;
        info!("Deleted book {id}");
        Ok(())
    }

    async fn save_vector(&self, id: BookId, vector: EncodedVector) -> Result<()> {
        self.mutate(|shelf| shelf.save_vector(id, vector)).await
    }
}
