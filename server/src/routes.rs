//! HTTP routes.

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use bookshelf_catalog::{Book, BookDraft, BookId};
use bookshelf_search::BackfillReport;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::error::{Result, ServerError};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

/// The public JSON shape of a book. The stored vector is never exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookView {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub pages: i32,
    pub summary: Option<String>,
    pub has_embedding: bool,
}

impl From<Book> for BookView {
    fn from(book: Book) -> Self {
        Self {
            has_embedding: book.embedding.is_present(),
            id: book.id,
            title: book.title,
            author: book.author,
            pages: book.pages,
            summary: book.summary,
        }
    }
}

fn views(books: Vec<Book>) -> Vec<BookView> {
    books.into_iter().map(BookView::from).collect()
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<usize>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/books", get(list_books).post(create_book))
        .route("/books/search", get(search_books))
        .route("/books/generate-embeddings", post(generate_embeddings))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<BookView>>> {
    Ok(Json(views(state.catalog.list_all().await?)))
}

async fn get_book(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BookId>,
) -> Result<Json<BookView>> {
    Ok(Json(state.catalog.get(id).await?.into()))
}

async fn create_book(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<BookDraft>,
) -> Result<impl IntoResponse> {
    let book = state.catalog.create(draft).await?;
    info!("Created book {}", book.id);
    let location = format!("/books/{}", book.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(BookView::from(book)),
    ))
}

async fn update_book(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BookId>,
    ApiJson(draft): ApiJson<BookDraft>,
) -> Result<StatusCode> {
    state.catalog.update(id, draft).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_book(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<BookId>,
) -> Result<StatusCode> {
    state.catalog.delete(id).await?;
    info!("Deleted book {id}");
    Ok(StatusCode::NO_CONTENT)
}

async fn search_books(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<Vec<BookView>>> {
    let query = params
        .q
        .ok_or_else(|| ServerError::BadRequest("missing query parameter q".to_string()))?;
    let books = match params.limit {
        Some(limit) => state.search.search(&query, limit).await?,
        None => state.search.search_default(&query).await?,
    };
    Ok(Json(views(books)))
}

async fn generate_embeddings(State(state): State<AppState>) -> Result<Json<BackfillReport>> {
    let report = state.search.backfill().await?;
    info!(
        "Embedding generation finished: {} of {} succeeded",
        report.succeeded, report.attempted
    );
    Ok(Json(report))
}
