//! Outcome of a backfill run.

use bookshelf_catalog::BookId;
use serde::{Deserialize, Serialize};

/// Why a single book was left without an embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The description template could not be rendered for the book.
    Description,
    /// The provider did not return a vector.
    Embedding,
    /// The provider returned a vector that cannot be stored.
    Encoding,
    /// The book was deleted before its vector could be saved.
    NotFound,
    /// The catalog refused the write.
    Storage,
}

/// A book the backfill could not embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackfillFailure {
    pub book_id: BookId,
    pub title: String,
    pub kind: FailureKind,
    pub reason: String,
}

/// Result of processing one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookOutcome {
    Embedded(BookId),
    Failed(BackfillFailure),
}

/// Counts for a backfill run.
///
/// Built by folding one [`BookOutcome`] per book through
/// [`BackfillReport::record`], so a failure adds to the report instead of
/// cutting the run short.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackfillReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<BackfillFailure>,
}

impl BackfillReport {
    /// Fold one outcome into the report.
    pub fn record(mut self, outcome: BookOutcome) -> Self {
        self.attempted += 1;
        match outcome {
            BookOutcome::Embedded(_) => self.succeeded += 1,
            BookOutcome::Failed(failure) => {
                self.failed += 1;
                self.failures.push(failure);
            }
        }
        self
    }
}
