//! Book records.

use bookshelf_embeddings::EncodedVector;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};

/// Stable identifier of a book.
pub type BookId = i64;

/// Maximum title length, in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum author length, in characters.
pub const MAX_AUTHOR_LEN: usize = 100;

/// Whether a book currently carries a stored embedding.
///
/// A present slot holds the persisted text as-is; it is only decoded when
/// the book is ranked, so a corrupt value still counts as present here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<EncodedVector>", into = "Option<EncodedVector>")]
pub enum EmbeddingSlot {
    #[default]
    Absent,
    Present(EncodedVector),
}

impl EmbeddingSlot {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn as_encoded(&self) -> Option<&EncodedVector> {
        match self {
            Self::Present(encoded) => Some(encoded),
            Self::Absent => None,
        }
    }
}

impl From<Option<EncodedVector>> for EmbeddingSlot {
    fn from(value: Option<EncodedVector>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}

impl From<EmbeddingSlot> for Option<EncodedVector> {
    fn from(value: EmbeddingSlot) -> Self {
        match value {
            EmbeddingSlot::Present(encoded) => Some(encoded),
            EmbeddingSlot::Absent => None,
        }
    }
}

/// A catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub pages: i32,

    /// Derived from the descriptive fields; written only by the search
    /// orchestrator.
    #[serde(default)]
    pub embedding: EmbeddingSlot,

    /// Optional human-readable summary. Nothing in this workspace fills it.
    #[serde(default)]
    pub summary: Option<String>,
}

impl Book {
    /// Build a new record from a validated draft.
    pub(crate) fn from_draft(id: BookId, draft: BookDraft) -> Self {
        Self {
            id,
            title: draft.title,
            author: draft.author,
            pages: draft.pages,
            embedding: EmbeddingSlot::Absent,
            summary: None,
        }
    }

    /// Overwrite the descriptive fields from a draft.
    ///
    /// Returns true when any field the embedding is derived from changed.
    pub(crate) fn apply(&mut self, draft: BookDraft, policy: StalePolicy) -> bool {
        let changed =
            self.title != draft.title || self.author != draft.author || self.pages != draft.pages;
        self.title = draft.title;
        self.author = draft.author;
        self.pages = draft.pages;
        if changed && policy == StalePolicy::Clear {
            self.embedding = EmbeddingSlot::Absent;
        }
        changed
    }
}

/// The caller-editable fields of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub pages: i32,
}

impl BookDraft {
    pub fn new(title: impl Into<String>, author: impl Into<String>, pages: i32) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            pages,
        }
    }

    /// Check the field constraints, reporting the first violation.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CatalogError::Validation("title is required".to_string()));
        }
        if self.title.chars().count() > MAX_TITLE_LEN {
            return Err(CatalogError::Validation(format!(
                "title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        if self.author.trim().is_empty() {
            return Err(CatalogError::Validation("author is required".to_string()));
        }
        if self.author.chars().count() > MAX_AUTHOR_LEN {
            return Err(CatalogError::Validation(format!(
                "author must be at most {MAX_AUTHOR_LEN} characters"
            )));
        }
        if self.pages < 1 {
            return Err(CatalogError::Validation(
                "pages must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// What happens to a stored embedding when a book's descriptive fields change.
///
/// `Keep` leaves the old vector in place, so search can rank an edited book
/// by what it used to say until the vector is cleared some other way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    #[default]
    Keep,
    Clear,
}
