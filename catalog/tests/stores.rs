//! Behaviour shared by every catalog store, run against both implementations.

use bookshelf_catalog::{
    BookDraft, CatalogError, CatalogStore, EmbeddingSlot, InMemoryCatalog, JsonFileCatalog,
    StalePolicy,
};
use bookshelf_embeddings::EncodedVector;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

async fn exercise_crud(store: &dyn CatalogStore) {
    let hobbit = store
        .create(BookDraft::new("The Hobbit", "J.R.R. Tolkien", 310))
        .await
        .unwrap();
    let dune = store
        .create(BookDraft::new("Dune", "Frank Herbert", 412))
        .await
        .unwrap();
    assert_eq!((hobbit.id, dune.id), (1, 2));

    let fetched = store.get(dune.id).await.unwrap();
    assert_eq!(fetched.title, "Dune");
    assert_eq!(fetched.embedding, EmbeddingSlot::Absent);
    assert_eq!(fetched.summary, None);

    let updated = store
        .update(dune.id, BookDraft::new("Dune", "Frank Herbert", 896))
        .await
        .unwrap();
    assert_eq!(updated.pages, 896);

    store.delete(hobbit.id).await.unwrap();
    assert!(matches!(
        store.get(hobbit.id).await,
        Err(CatalogError::NotFound(1))
    ));
    assert!(store.delete(hobbit.id).await.unwrap_err().is_not_found());

    let titles: Vec<_> = store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.title)
        .collect();
    assert_eq!(titles, vec!["Dune"]);
}

async fn exercise_vector_partition(store: &dyn CatalogStore) {
    for (title, author) in [("A", "x"), ("B", "y"), ("C", "z")] {
        store.create(BookDraft::new(title, author, 100)).await.unwrap();
    }

    store
        .save_vector(2, EncodedVector::from_raw("[0.5,0.5]"))
        .await
        .unwrap();

    let with: Vec<_> = store
        .list_with_vector()
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    let without: Vec<_> = store
        .list_without_vector()
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(with, vec![2]);
    assert_eq!(without, vec![1, 3]);

    let book = store.get(2).await.unwrap();
    assert_eq!(book.title, "B");
    assert_eq!(
        book.embedding.as_encoded().map(EncodedVector::as_str),
        Some("[0.5,0.5]")
    );

    assert!(matches!(
        store
            .save_vector(99, EncodedVector::from_raw("[1]"))
            .await,
        Err(CatalogError::NotFound(99))
    ));
}

async fn exercise_validation(store: &dyn CatalogStore) {
    assert!(matches!(
        store.create(BookDraft::new("", "Nobody", 10)).await,
        Err(CatalogError::Validation(_))
    ));
    let book = store
        .create(BookDraft::new("Emma", "Jane Austen", 474))
        .await
        .unwrap();
    assert!(matches!(
        store.update(book.id, BookDraft::new("Emma", "Jane Austen", 0)).await,
        Err(CatalogError::Validation(_))
    ));
    assert!(matches!(
        store.update(42, BookDraft::new("Emma", "Jane Austen", 10)).await,
        Err(CatalogError::NotFound(42))
    ));
    assert_eq!(store.get(book.id).await.unwrap().pages, 474);
}

#[tokio::test]
async fn test_in_memory_crud() {
    exercise_crud(&InMemoryCatalog::new()).await;
}

#[tokio::test]
async fn test_in_memory_vector_partition() {
    exercise_vector_partition(&InMemoryCatalog::new()).await;
}

#[tokio::test]
async fn test_in_memory_validation() {
    exercise_validation(&InMemoryCatalog::new()).await;
}

#[tokio::test]
async fn test_file_crud() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileCatalog::open(dir.path().join("catalog.json"), StalePolicy::Keep)
        .await
        .unwrap();
    exercise_crud(&store).await;
}

#[tokio::test]
async fn test_file_vector_partition() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileCatalog::open(dir.path().join("catalog.json"), StalePolicy::Keep)
        .await
        .unwrap();
    exercise_vector_partition(&store).await;
}

#[tokio::test]
async fn test_file_validation() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileCatalog::open(dir.path().join("catalog.json"), StalePolicy::Keep)
        .await
        .unwrap();
    exercise_validation(&store).await;
}

#[tokio::test]
async fn test_file_catalog_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/dir/catalog.json");

    {
        let store = JsonFileCatalog::open(&path, StalePolicy::Keep).await.unwrap();
        store
            .create(BookDraft::new("Dune", "Frank Herbert", 412))
            .await
            .unwrap();
        store
            .save_vector(1, EncodedVector::from_raw("[1,0]"))
            .await
            .unwrap();
        store
            .create(BookDraft::new("Emma", "Jane Austen", 474))
            .await
            .unwrap();
        store.delete(2).await.unwrap();
    }

    let store = JsonFileCatalog::open(&path, StalePolicy::Keep).await.unwrap();
    let books = store.list_all().await.unwrap();
    assert_eq!(books.len(), 1);
    assert!(books[0].embedding.is_present());

    // Ids keep counting from where the previous session stopped.
    let next = store
        .create(BookDraft::new("Ulysses", "James Joyce", 730))
        .await
        .unwrap();
    assert_eq!(next.id, 3);
    assert!(!path.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn test_corrupt_document_fails_to_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = JsonFileCatalog::open(&path, StalePolicy::Keep).await;
    assert!(matches!(result, Err(CatalogError::Serialization(_))));
}

#[tokio::test]
async fn test_clear_policy_drops_vector_on_edit() {
    let store = InMemoryCatalog::with_stale_policy(StalePolicy::Clear);
    let book = store
        .create(BookDraft::new("Dune", "Frank Herbert", 412))
        .await
        .unwrap();
    store
        .save_vector(book.id, EncodedVector::from_raw("[1,0]"))
        .await
        .unwrap();

    store
        .update(book.id, BookDraft::new("Dune", "F. Herbert", 412))
        .await
        .unwrap();

    assert_eq!(store.get(book.id).await.unwrap().embedding, EmbeddingSlot::Absent);
}

#[tokio::test]
async fn test_keep_policy_leaves_stale_vector() {
    let store = InMemoryCatalog::new();
    let book = store
        .create(BookDraft::new("Dune", "Frank Herbert", 412))
        .await
        .unwrap();
    store
        .save_vector(book.id, EncodedVector::from_raw("[1,0]"))
        .await
        .unwrap();

    store
        .update(book.id, BookDraft::new("Children of Dune", "Frank Herbert", 444))
        .await
        .unwrap();

    assert!(store.get(book.id).await.unwrap().embedding.is_present());
}

#[tokio::test]
async fn test_reopen_with_stale_counter_keeps_existing_books() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(
        &path,
        r#"{
            "next_id": 1,
            "books": [
                { "id": 1, "title": "Dune", "author": "Frank Herbert", "pages": 412, "embedding": null },
                { "id": 2, "title": "Emma", "author": "Jane Austen", "pages": 474, "embedding": null }
            ]
        }"#,
    )
    .unwrap();

    let store = JsonFileCatalog::open(&path, StalePolicy::Keep).await.unwrap();
    let created = store
        .create(BookDraft::new("Ulysses", "James Joyce", 730))
        .await
        .unwrap();

    assert_eq!(created.id, 3);
    assert_eq!(store.get(1).await.unwrap().title, "Dune");
    assert_eq!(store.list_all().await.unwrap().len(), 3);
}
