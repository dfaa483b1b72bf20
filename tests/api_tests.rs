//! API integration tests, driving the router in-process

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use book_server::{
    api,
    config::{AppConfig, CatalogConfig},
    AppState,
};

fn app() -> Router {
    let config = AppConfig {
        catalog: CatalogConfig {
            search_delay_ms: 0,
            seed_sample_data: true,
        },
        ..AppConfig::default()
    };
    api::create_router(AppState::new(config))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    (status, String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8"))
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_str(&body).expect("Failed to parse response"))
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_str(&body).expect("Failed to parse response"))
}

/// Split an SSE body into (event, data) pairs
fn parse_events(body: &str) -> Vec<(String, String)> {
    body.split("\n\n")
        .filter_map(|block| {
            let mut event = None;
            let mut data = String::new();
            for line in block.lines() {
                if let Some(name) = line.strip_prefix("event:") {
                    event = Some(name.trim().to_string());
                } else if let Some(value) = line.strip_prefix("data:") {
                    data.push_str(value.trim());
                }
            }
            event.map(|e| (e, data))
        })
        .collect()
}

async fn search(app: &Router, query: &str) -> (Vec<Value>, Vec<String>) {
    let request = Request::get(format!("/api/v1/books/search?{}", query))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);

    let events = parse_events(&body);
    let names = events.iter().map(|(name, _)| name.clone()).collect();
    let books = events
        .iter()
        .filter(|(name, _)| name == "book")
        .map(|(_, data)| serde_json::from_str(data).expect("Invalid book payload"))
        .collect();
    (books, names)
}

fn titles(books: &[Value]) -> Vec<&str> {
    books.iter().map(|b| b["title"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = get_json(&app, "/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body.get("books").is_none());

    let (status, body) = get_json(&app, "/api/v1/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["books"], 3);
}

#[tokio::test]
async fn test_list_books() {
    let (status, body) = get_json(&app(), "/api/v1/books").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["books"],
        json!([
            {"id": 1, "title": "Clean Code", "author": "Robert C. Martin", "isbn": "978-0132350884", "category": "TECHNOLOGY", "price": 47.99},
            {"id": 2, "title": "Effective Java", "author": "Joshua Bloch", "isbn": "978-0134685991", "category": "TECHNOLOGY", "price": 54.99},
            {"id": 3, "title": "1984", "author": "George Orwell", "isbn": "978-0451524935", "category": "FICTION", "price": 15.99}
        ])
    );
}

#[tokio::test]
async fn test_get_book() {
    let app = app();
    let (status, body) = get_json(&app, "/api/v1/books/3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["title"], "1984");
    assert_eq!(body["book"]["author"], "George Orwell");
}

#[tokio::test]
async fn test_get_missing_book_is_not_an_error() {
    let (status, body) = get_json(&app(), "/api/v1/books/999").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["book"].is_null());
}

#[tokio::test]
async fn test_get_book_with_invalid_id() {
    let (status, body) = get_json(&app(), "/api/v1/books/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_find_books_by_category() {
    let app = app();
    let (status, body) = get_json(&app, "/api/v1/books/category/TECHNOLOGY").await;
    assert_eq!(status, StatusCode::OK);
    let books = body["books"].as_array().unwrap();
    assert_eq!(titles(books), vec!["Clean Code", "Effective Java"]);

    let (_, body) = get_json(&app, "/api/v1/books/category/fiction").await;
    assert_eq!(titles(body["books"].as_array().unwrap()), vec!["1984"]);

    let (status, body) = get_json(&app, "/api/v1/books/category/POETRY").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["books"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_book_assigns_id() {
    let app = app();
    let (status, body) = post_json(
        &app,
        "/api/v1/books",
        json!({
            "id": 1,
            "title": "Refactoring",
            "author": "Martin Fowler",
            "isbn": "978-0134757599",
            "category": "TECHNOLOGY",
            "price": 39.5
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["book"]["id"], 4);
    assert_eq!(body["book"]["title"], "Refactoring");

    let (_, body) = get_json(&app, "/api/v1/books/4").await;
    assert_eq!(body["book"]["author"], "Martin Fowler");
    let (_, body) = get_json(&app, "/api/v1/books/1").await;
    assert_eq!(body["book"]["title"], "Clean Code");

    let (_, body) = get_json(&app, "/api/v1/books").await;
    assert_eq!(body["books"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_create_book_accepts_unvalidated_input() {
    let (status, body) = post_json(
        &app(),
        "/api/v1/books",
        json!({"title": "Mystery", "category": "NOT_A_CATEGORY", "price": -3.0}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["book"]["category"], "UNSPECIFIED");
    assert_eq!(body["book"]["price"], -3.0);
}

#[tokio::test]
async fn test_create_book_with_unset_or_out_of_range_category() {
    let app = app();
    let (status, body) = post_json(
        &app,
        "/api/v1/books",
        json!({"title": "X", "category": null, "price": 1.0}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["book"]["category"], "UNSPECIFIED");

    let (status, body) = post_json(
        &app,
        "/api/v1/books",
        json!({"title": "Y", "category": 3000000000i64, "price": 1.0}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["book"]["category"], "UNSPECIFIED");
    assert_eq!(body["book"]["id"], 5);
}

#[tokio::test]
async fn test_create_book_with_malformed_body() {
    let request = Request::post("/api/v1/books")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["code"], 2);
}

#[tokio::test]
async fn test_search_streams_matches_then_done() {
    let app = app();
    let (books, events) = search(&app, "query=java").await;
    assert_eq!(titles(&books), vec!["Effective Java"]);
    assert_eq!(events, vec!["book", "done"]);

    let (books, _) = search(&app, "query=martin&max_results=0").await;
    assert_eq!(titles(&books), vec!["Clean Code"]);
}

#[tokio::test]
async fn test_search_max_results() {
    let app = app();
    let (books, events) = search(&app, "query=o&max_results=1").await;
    assert_eq!(books.len(), 1);
    assert_eq!(events.last().map(String::as_str), Some("done"));

    let (books, _) = search(&app, "query=o").await;
    assert_eq!(books.len(), 3);
}

#[tokio::test]
async fn test_search_without_matches() {
    let (books, events) = search(&app(), "query=tolkien").await;
    assert!(books.is_empty());
    assert_eq!(events, vec!["done"]);
}

#[tokio::test]
async fn test_search_with_invalid_max_results() {
    let request = Request::get("/api/v1/books/search?query=java&max_results=lots")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_with_blank_max_results() {
    let (books, events) = search(&app(), "query=o&max_results=").await;
    assert_eq!(books.len(), 3);
    assert_eq!(events.last().map(String::as_str), Some("done"));
}

#[tokio::test]
async fn test_openapi_document() {
    let (status, body) = get_json(&app(), "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/books/search"].is_object());
}
