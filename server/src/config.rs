//! Server configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables, then command-line flags (applied by `main`).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use bookshelf_catalog::StalePolicy;
use bookshelf_embeddings::HuggingFaceConfig;
use bookshelf_search::SearchConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServerError};

pub const ENV_BIND: &str = "BOOKSHELF_BIND";
pub const ENV_DATA_PATH: &str = "BOOKSHELF_DATA_PATH";
pub const ENV_EMBEDDING_URL: &str = "BOOKSHELF_EMBEDDING_URL";
pub const ENV_EMBEDDING_MODEL: &str = "BOOKSHELF_EMBEDDING_MODEL";
pub const ENV_API_TOKEN: &str = "HF_API_TOKEN";

/// Top-level configuration for the server binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind: String,

    /// Where books are kept.
    pub storage: StorageConfig,

    /// Catalog behaviour.
    pub catalog: CatalogConfig,

    /// Remote embedding model.
    pub embedding: HuggingFaceConfig,

    /// Search and backfill tuning.
    pub search: SearchConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            storage: StorageConfig::default(),
            catalog: CatalogConfig::default(),
            embedding: HuggingFaceConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load defaults, overlaid with the TOML file at `path` if one is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    ServerError::Config(format!("failed to read {}: {e}", path.display()))
                })?;
                Self::from_toml(&content)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Apply overrides from environment-style variables.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = var(ENV_BIND) {
            self.bind = bind;
        }
        if let Some(path) = var(ENV_DATA_PATH) {
            self.storage = StorageConfig::File {
                path: PathBuf::from(path),
            };
        }
        if let Some(url) = var(ENV_EMBEDDING_URL) {
            self.embedding.base_url = url;
        }
        if let Some(model) = var(ENV_EMBEDDING_MODEL) {
            self.embedding.model = model;
        }
        if let Some(token) = var(ENV_API_TOKEN).filter(|t| !t.is_empty()) {
            self.embedding.api_token = Some(token);
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .map_err(|e| ServerError::Config(format!("invalid bind address {:?}: {e}", self.bind)))
    }
}

/// Where books are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageConfig {
    /// Lost when the process exits.
    InMemory,
    /// A JSON document on disk.
    File { path: PathBuf },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::File {
            path: dirs::data_dir()
                .unwrap_or_default()
                .join("bookshelf/catalog.json"),
        }
    }
}

/// Catalog behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// What happens to a book's embedding when it is edited.
    pub stale_policy: StalePolicy,
}
