//! # Bookshelf Server
//!
//! JSON-over-HTTP access to the catalog, plus the two semantic operations:
//!
//! | Method | Path                          | Purpose                          |
//! |--------|-------------------------------|----------------------------------|
//! | GET    | `/books`                      | List every book                  |
//! | POST   | `/books`                      | Create a book                    |
//! | GET    | `/books/{id}`                 | Fetch one book                   |
//! | PUT    | `/books/{id}`                 | Replace a book's fields          |
//! | DELETE | `/books/{id}`                 | Remove a book                    |
//! | GET    | `/books/search?q=&limit=`     | Rank books against a query       |
//! | POST   | `/books/generate-embeddings`  | Embed every book lacking a vector|
//! | GET    | `/health`                     | Liveness                         |

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use config::{CatalogConfig, ServerConfig, StorageConfig};
pub use error::{Result, ServerError};
pub use routes::{BookView, router};
pub use state::AppState;

use std::future::Future;

use tokio::net::TcpListener;
use tracing::info;

/// Serve `state` on an already-bound listener until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
