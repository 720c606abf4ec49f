//! Shared handler state and its construction from configuration.

use std::sync::Arc;

use bookshelf_catalog::{CatalogStore, InMemoryCatalog, JsonFileCatalog};
use bookshelf_embeddings::{EmbeddingProvider, HuggingFaceProvider};
use bookshelf_search::SemanticSearch;
use tracing::info;

use crate::config::{ServerConfig, StorageConfig};
use crate::error::Result;

/// State handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub search: Arc<SemanticSearch<dyn CatalogStore>>,
}

impl AppState {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        provider: Arc<dyn EmbeddingProvider>,
        config: bookshelf_search::SearchConfig,
    ) -> Self {
        let search = SemanticSearch::new(provider, Arc::clone(&catalog), config);
        Self {
            catalog,
            search: Arc::new(search),
        }
    }

    /// Open the configured store and embedding provider.
    pub async fn from_config(config: &ServerConfig) -> Result<Self> {
        let policy = config.catalog.stale_policy;
        let catalog: Arc<dyn CatalogStore> = match &config.storage {
            StorageConfig::InMemory => {
                info!("Using in-memory catalog");
                Arc::new(InMemoryCatalog::with_stale_policy(policy))
            }
            StorageConfig::File { path } => {
                info!("Using catalog file {}", path.display());
                Arc::new(JsonFileCatalog::open(path, policy).await?)
            }
        };

        let provider = HuggingFaceProvider::new(config.embedding.clone())?;
        info!(
            "Embedding provider {} ({}, {} dimensions)",
            provider.name(),
            provider.model(),
            provider.dimension()
        );

        Ok(Self::new(catalog, Arc::new(provider), config.search.clone()))
    }
}
