use std::path::PathBuf;

use anyhow::Context;
use bookshelf_server::{AppState, ServerConfig, StorageConfig};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Book catalog with semantic search.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:8080.
    #[arg(long)]
    bind: Option<String>,

    /// Catalog file. Overrides the configured storage.
    #[arg(long, conflicts_with = "in_memory")]
    data_path: Option<PathBuf>,

    /// Keep the catalog in memory only.
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ServerConfig::load(cli.config.as_deref())?;
    config.apply_env(|key| std::env::var(key).ok());
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if let Some(path) = cli.data_path {
        config.storage = StorageConfig::File { path };
    }
    if cli.in_memory {
        config.storage = StorageConfig::InMemory;
    }
    if config.embedding.api_token.is_none() {
        warn!("No API token configured; inference requests will be anonymous");
    }

    let addr = config.bind_addr()?;
    let state = AppState::from_config(&config)
        .await
        .context("failed to initialise catalog or embedding provider")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    bookshelf_server::serve(listener, state, shutdown_signal()).await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
