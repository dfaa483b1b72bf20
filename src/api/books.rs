//! Book (catalog) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use tokio_stream::{Stream, StreamExt};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Book, Category, CreateBook, SearchQuery},
};

/// Single book lookup result; `book` is null when the id is unknown
#[derive(Serialize, Deserialize, ToSchema)]
pub struct BookResponse {
    pub book: Option<Book>,
}

/// Book list wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct BookListResponse {
    pub books: Vec<Book>,
}

/// Name of the SSE event carrying one search result
pub const BOOK_EVENT: &str = "book";
/// Name of the SSE event closing a search stream
pub const DONE_EVENT: &str = "done";

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = i64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Lookup result, `book` is null when missing", body = BookResponse),
        (status = 400, description = "Invalid ID", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> AppResult<Json<BookResponse>> {
    let book = state.services.catalog.get_book(id).await;
    Ok(Json(BookResponse { book }))
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books in insertion order", body = BookListResponse)
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> Json<BookListResponse> {
    let books = state.services.catalog.list_books().await;
    Json(BookListResponse { books })
}

/// Find books by category
#[utoipa::path(
    get,
    path = "/books/category/{category}",
    tag = "books",
    params(("category" = Category, Path, description = "Category name or code")),
    responses(
        (status = 200, description = "Books in the category, possibly none", body = BookListResponse)
    )
)]
pub async fn find_books_by_category(
    State(state): State<crate::AppState>,
    WithRejection(Path(category), _): WithRejection<Path<String>, AppError>,
) -> AppResult<Json<BookListResponse>> {
    let category = Category::from(category.as_str());
    let books = state.services.catalog.find_books_by_category(category).await;
    Ok(Json(BookListResponse { books }))
}

/// Search books by title or author.
///
/// Results arrive as Server-Sent Events: one `book` event per match with the
/// book as JSON data, then a single `done` event.
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(SearchQuery),
    responses(
        (status = 200, description = "Stream of `book` events followed by `done`", content_type = "text/event-stream", body = Book),
        (status = 400, description = "Invalid parameters", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    WithRejection(Query(query), _): WithRejection<Query<SearchQuery>, AppError>,
) -> Sse<impl Stream<Item = Result<Event, AppError>>> {
    tracing::info!(
        "SearchBooks: query={}, max_results={:?}",
        query.query,
        query.max_results
    );

    let results = state
        .services
        .catalog
        .search_books(query)
        .map(|book| {
            Event::default()
                .event(BOOK_EVENT)
                .json_data(&book)
                .map_err(|e| AppError::Internal(e.to_string()))
        })
        .chain(tokio_stream::once(Ok(Event::default()
            .event(DONE_EVENT)
            .data(""))));

    Sse::new(results).keep_alive(KeepAlive::default())
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created with a server-assigned id", body = BookResponse),
        (status = 400, description = "Malformed body", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    WithRejection(Json(data), _): WithRejection<Json<CreateBook>, AppError>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    let book = state.services.catalog.create_book(data).await;
    Ok((StatusCode::CREATED, Json(BookResponse { book: Some(book) })))
}
