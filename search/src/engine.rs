//! Semantic search orchestrator.

use std::sync::Arc;

use bookshelf_catalog::{Book, CatalogError, CatalogStore};
use bookshelf_embeddings::{
    Embedding, EmbeddingError, EmbeddingProvider, VectorCodec, rank,
};
use futures::future;
use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::report::{BackfillFailure, BackfillReport, BookOutcome, FailureKind};

/// Coordinates embedding generation and similarity search over a catalog.
///
/// `search` only reads from the catalog and `backfill` only writes vectors,
/// so both may run at the same time. A search that overlaps a backfill sees
/// whichever vectors were saved before it listed the catalog.
pub struct SemanticSearch<C: ?Sized> {
    /// Embedding provider shared by queries and backfill.
    provider: Arc<dyn EmbeddingProvider>,

    /// Catalog storage.
    catalog: Arc<C>,

    /// Codec sized to the provider's dimension.
    codec: VectorCodec,

    /// Configuration.
    config: SearchConfig,
}

impl<C> SemanticSearch<C>
where
    C: CatalogStore + ?Sized,
{
    /// Create an orchestrator. Stored vectors are expected to have the
    /// provider's dimension.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, catalog: Arc<C>, config: SearchConfig) -> Self {
        let codec = VectorCodec::new(provider.dimension());
        Self {
            provider,
            catalog,
            codec,
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Return up to `limit` books whose stored embeddings are closest to the
    /// query, best first.
    ///
    /// Books whose stored vector cannot be decoded are left out and logged.
    /// Failing to embed the query fails the whole call.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Book>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidQuery(
                "query must not be blank".to_string(),
            ));
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        debug!("Processing query: {query}");

        let query_vector = self
            .config
            .query_retry
            .run(|| self.provider.embed(query))
            .await?;
        if query_vector.len() != self.codec.dimension() {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.codec.dimension(),
                actual: query_vector.len(),
            }
            .into());
        }

        let books = self.catalog.list_with_vector().await?;
        let candidates = self.decode_candidates(&books);

        let ranked = rank(&query_vector, &candidates, limit);
        debug!(
            "Ranked {} of {} candidates for query: {query}",
            ranked.len(),
            candidates.len()
        );

        Ok(ranked
            .into_iter()
            .map(|result| books[result.id].clone())
            .collect())
    }

    /// Search with the configured default limit.
    pub async fn search_default(&self, query: &str) -> Result<Vec<Book>> {
        self.search(query, self.config.default_limit).await
    }

    /// Pair each decodable stored vector with the index of its book.
    fn decode_candidates(&self, books: &[Book]) -> Vec<(usize, Embedding)> {
        books
            .iter()
            .enumerate()
            .filter_map(|(index, book)| {
                let encoded = book.embedding.as_encoded()?;
                match self.codec.decode(encoded) {
                    Ok(embedding) => Some((index, embedding)),
                    Err(e) => {
                        warn!(
                            book_id = book.id,
                            "Skipping book with malformed embedding: {e}"
                        );
                        None
                    }
                }
            })
            .collect()
    }

    /// Generate and store embeddings for every book that lacks one.
    ///
    /// Each book is handled on its own. A failure is logged and recorded in
    /// the report, and the run moves on to the next book. Only failing to
    /// list the catalog fails the call. Vectors saved before the returned
    /// future is dropped stay saved.
    pub async fn backfill(&self) -> Result<BackfillReport> {
        let pending = self.catalog.list_without_vector().await?;
        info!("Generating embeddings for {} books", pending.len());

        let concurrency = self.config.backfill.concurrency.max(1);
        let report = stream::iter(pending)
            .map(|book| self.embed_book(book))
            .buffered(concurrency)
            .fold(BackfillReport::default(), |report, outcome| {
                future::ready(report.record(outcome))
            })
            .await;

        info!(
            "Backfill finished: {} attempted, {} succeeded, {} failed",
            report.attempted, report.succeeded, report.failed
        );
        Ok(report)
    }

    async fn embed_book(&self, book: Book) -> BookOutcome {
        let text = match self.config.description_template.render(&book) {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to describe book {}: {e}", book.id);
                return failed(book, FailureKind::Description, e.to_string());
            }
        };

        let embedding = match self
            .config
            .backfill
            .retry
            .run(|| self.provider.embed(&text))
            .await
        {
            Ok(embedding) => embedding,
            Err(e) => {
                error!("Failed to generate embedding for book {} ({}): {e}", book.id, book.title);
                return failed(book, FailureKind::Embedding, e.to_string());
            }
        };

        let encoded = match self.codec.encode(&embedding) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!("Provider returned an unstorable vector for book {}: {e}", book.id);
                return failed(book, FailureKind::Encoding, e.to_string());
            }
        };

        match self.catalog.save_vector(book.id, encoded).await {
            Ok(()) => {
                info!("Generated embedding for book: {}", book.title);
                BookOutcome::Embedded(book.id)
            }
            Err(CatalogError::NotFound(id)) => {
                warn!("Book {id} was removed before its embedding could be saved");
                failed(book, FailureKind::NotFound, format!("book {id} not found"))
            }
            Err(e) => {
                error!("Failed to save embedding for book {}: {e}", book.id);
                failed(book, FailureKind::Storage, e.to_string())
            }
        }
    }
}

fn failed(book: Book, kind: FailureKind, reason: String) -> BookOutcome {
    BookOutcome::Failed(BackfillFailure {
        book_id: book.id,
        title: book.title,
        kind,
        reason,
    })
}
