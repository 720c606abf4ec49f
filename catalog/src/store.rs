//! The catalog store capability.
//!
//! Search code depends only on [`CatalogStore`]. Two implementations ship
//! with this crate: [`crate::InMemoryCatalog`] and [`crate::JsonFileCatalog`].

use std::collections::BTreeMap;

use async_trait::async_trait;
use bookshelf_embeddings::EncodedVector;
use serde::{Deserialize, Serialize};

use crate::book::{Book, BookDraft, BookId, EmbeddingSlot, StalePolicy};
use crate::error::{CatalogError, Result};

/// Storage for books.
///
/// Listing methods return books in ascending id order.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every book.
    async fn list_all(&self) -> Result<Vec<Book>>;

    /// Books without a stored embedding.
    async fn list_without_vector(&self) -> Result<Vec<Book>>;

    /// Books with a stored embedding, whether or not it decodes.
    async fn list_with_vector(&self) -> Result<Vec<Book>>;

    /// A single book, or [`CatalogError::NotFound`].
    async fn get(&self, id: BookId) -> Result<Book>;

    /// Validate and insert a new book with a fresh id.
    async fn create(&self, draft: BookDraft) -> Result<Book>;

    /// Validate and replace the descriptive fields of a book.
    async fn update(&self, id: BookId, draft: BookDraft) -> Result<Book>;

    /// Remove a book.
    async fn delete(&self, id: BookId) -> Result<()>;

    /// Attach an embedding to a book. Touches nothing else on the record.
    async fn save_vector(&self, id: BookId, vector: EncodedVector) -> Result<()>;
}

/// Books keyed by id plus the next id to hand out.
///
/// Both store implementations keep one of these; the file-backed store also
/// serializes it as its on-disk document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ShelfDocument")]
pub(crate) struct Shelf {
    next_id: BookId,
    #[serde(with = "book_list")]
    books: BTreeMap<BookId, Book>,
    #[serde(skip)]
    stale_policy: StalePolicy,
}

/// The on-disk form of a [`Shelf`], before its id counter is checked.
#[derive(Deserialize)]
struct ShelfDocument {
    next_id: BookId,
    #[serde(with = "book_list")]
    books: BTreeMap<BookId, Book>,
}

impl From<ShelfDocument> for Shelf {
    /// A counter at or below a stored id would hand that id out again, so
    /// it is raised past the highest one.
    fn from(document: ShelfDocument) -> Self {
        let floor = document.books.keys().next_back().map_or(1, |id| id + 1);
        Self {
            next_id: document.next_id.max(floor),
            books: document.books,
            stale_policy: StalePolicy::default(),
        }
    }
}

impl Shelf {
    pub(crate) fn new(stale_policy: StalePolicy) -> Self {
        Self {
            next_id: 1,
            books: BTreeMap::new(),
            stale_policy,
        }
    }

    pub(crate) fn with_policy(mut self, stale_policy: StalePolicy) -> Self {
        self.stale_policy = stale_policy;
        self
    }

    pub(crate) fn len(&self) -> usize {
        self.books.len()
    }

    pub(crate) fn filtered(&self, keep: impl Fn(&Book) -> bool) -> Vec<Book> {
        self.books.values().filter(|b| keep(b)).cloned().collect()
    }

    pub(crate) fn get(&self, id: BookId) -> Result<Book> {
        self.books.get(&id).cloned().ok_or(CatalogError::NotFound(id))
    }

    pub(crate) fn create(&mut self, draft: BookDraft) -> Result<Book> {
        draft.validate()?;
        let id = self.next_id;
        self.next_id += 1;
        let book = Book::from_draft(id, draft);
        self.books.insert(id, book.clone());
        Ok(book)
    }

    pub(crate) fn update(&mut self, id: BookId, draft: BookDraft) -> Result<Book> {
        draft.validate()?;
        let policy = self.stale_policy;
        let book = self.books.get_mut(&id).ok_or(CatalogError::NotFound(id))?;
        book.apply(draft, policy);
        Ok(book.clone())
    }

    pub(crate) fn delete(&mut self, id: BookId) -> Result<()> {
        self.books
            .remove(&id)
            .map(|_| ())
            .ok_or(CatalogError::NotFound(id))
    }

    pub(crate) fn save_vector(&mut self, id: BookId, vector: EncodedVector) -> Result<()> {
        let book = self.books.get_mut(&id).ok_or(CatalogError::NotFound(id))?;
        book.embedding = EmbeddingSlot::Present(vector);
        Ok(())
    }
}

/// Books are written as a plain array; the map is rebuilt on load.
mod book_list {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::book::{Book, BookId};

    pub(super) fn serialize<S: Serializer>(
        books: &BTreeMap<BookId, Book>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let list: Vec<&Book> = books.values().collect();
        list.serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<BookId, Book>, D::Error> {
        let list = Vec::<Book>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|book| (book.id, book)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ids_are_never_reused() {
        let mut shelf = Shelf::new(StalePolicy::Keep);
        let a = shelf.create(BookDraft::new("A", "X", 1)).unwrap();
        let b = shelf.create(BookDraft::new("B", "Y", 2)).unwrap();
        shelf.delete(b.id).unwrap();
        let c = shelf.create(BookDraft::new("C", "Z", 3)).unwrap();

        assert_eq!((a.id, b.id, c.id), (1, 2, 3));
    }

    #[test]
    fn test_document_round_trip_keeps_next_id() {
        let mut shelf = Shelf::new(StalePolicy::Keep);
        shelf.create(BookDraft::new("A", "X", 1)).unwrap();
        shelf.create(BookDraft::new("B", "Y", 2)).unwrap();
        shelf.delete(1).unwrap();

        let json = serde_json::to_string(&shelf).unwrap();
        let mut loaded: Shelf = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.create(BookDraft::new("C", "Z", 3)).unwrap().id, 3);
    }

    #[test]
    fn test_stale_counter_never_overwrites_a_book() {
        let json = serde_json::json!({
            "next_id": 2,
            "books": [
                { "id": 1, "title": "A", "author": "X", "pages": 1, "embedding": null },
                { "id": 5, "title": "B", "author": "Y", "pages": 2, "embedding": "[1,0]" },
            ]
        });
        let mut loaded: Shelf = serde_json::from_value(json).unwrap();

        let created = loaded.create(BookDraft::new("C", "Z", 3)).unwrap();
        assert_eq!(created.id, 6);
        assert_eq!(loaded.get(5).unwrap().title, "B");
        assert_eq!(loaded.len(), 3);
    }

    #[test]
    fn test_counter_ahead_of_books_is_kept() {
        let json = serde_json::json!({ "next_id": 9, "books": [] });
        let mut loaded: Shelf = serde_json::from_value(json).unwrap();
        assert_eq!(loaded.create(BookDraft::new("A", "X", 1)).unwrap().id, 9);
    }
}
