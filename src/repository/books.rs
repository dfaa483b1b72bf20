//! In-memory book storage
//!
//! Books live in an insertion-ordered map behind an async read/write lock.
//! Identifiers come from a separate atomic counter, so allocating an id never
//! waits on readers. Nothing here returns an error: a missing book or an
//! empty result set is an ordinary outcome.

use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};
use std::time::Duration;

use indexmap::IndexMap;
use tokio::sync::{mpsc, RwLock};

use crate::models::{Book, Category, CreateBook, SearchQuery};

/// Concurrent, insertion-ordered book store
#[derive(Clone)]
pub struct BooksRepository {
    books: Arc<RwLock<IndexMap<i64, Book>>>,
    next_id: Arc<AtomicI64>,
    search_delay: Duration,
}

impl BooksRepository {
    /// Create an empty store. The first created book gets id 1.
    pub fn new(search_delay: Duration) -> Self {
        Self {
            books: Arc::new(RwLock::new(IndexMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            search_delay,
        }
    }

    /// Create a store holding the three sample books (ids 1 to 3).
    pub fn with_sample_data(search_delay: Duration) -> Self {
        let mut books = IndexMap::new();
        for book in sample_books() {
            books.insert(book.id, book);
        }
        let next_id = books.keys().copied().max().unwrap_or(0) + 1;

        Self {
            books: Arc::new(RwLock::new(books)),
            next_id: Arc::new(AtomicI64::new(next_id)),
            search_delay,
        }
    }

    /// Get a book by ID
    pub async fn get(&self, id: i64) -> Option<Book> {
        self.books.read().await.get(&id).cloned()
    }

    /// List all books in insertion order
    pub async fn list(&self) -> Vec<Book> {
        self.books.read().await.values().cloned().collect()
    }

    /// Create a book under a freshly allocated id. Any id carried by
    /// `data` is discarded.
    pub async fn create(&self, data: CreateBook) -> Book {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let book = data.into_book(id);
        self.books.write().await.insert(id, book.clone());
        book
    }

    /// All books in the given category, in insertion order
    pub async fn find_by_category(&self, category: Category) -> Vec<Book> {
        self.books
            .read()
            .await
            .values()
            .filter(|book| book.category == category)
            .cloned()
            .collect()
    }

    /// Stream matching books into `sink`, one at a time.
    ///
    /// Matches are taken from a snapshot captured when the call starts; the
    /// lock is released before anything is sent. Each book is handed over
    /// before the next one is produced, and the configured delay is waited
    /// between consecutive books. Production stops as soon as the receiving
    /// side is dropped, including in the middle of a delay.
    ///
    /// Returns the number of books delivered.
    pub async fn search(&self, query: &SearchQuery, sink: mpsc::Sender<Book>) -> usize {
        let books = self.books.read().await;
        let matches: Vec<Book> = books
            .values()
            .filter(|book| query.matches(book))
            .take(query.limit().unwrap_or(usize::MAX))
            .cloned()
            .collect();
        drop(books);

        let total = matches.len();
        let mut delivered = 0;

        for book in matches {
            tracing::info!("Found book: {}", book.title);
            if sink.send(book).await.is_err() {
                tracing::debug!("Search consumer went away after {} book(s)", delivered);
                return delivered;
            }
            delivered += 1;

            if delivered < total && !self.search_delay.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(self.search_delay) => {}
                    _ = sink.closed() => {
                        tracing::debug!("Search consumer went away after {} book(s)", delivered);
                        return delivered;
                    }
                }
            }
        }

        delivered
    }

    /// Number of stored books
    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.books.read().await.is_empty()
    }
}

/// Records every fresh catalog starts with
fn sample_books() -> Vec<Book> {
    vec![
        CreateBook::new(
            "Clean Code",
            "Robert C. Martin",
            "978-0132350884",
            Category::Technology,
            47.99,
        )
        .into_book(1),
        CreateBook::new(
            "Effective Java",
            "Joshua Bloch",
            "978-0134685991",
            Category::Technology,
            54.99,
        )
        .into_book(2),
        CreateBook::new(
            "1984",
            "George Orwell",
            "978-0451524935",
            Category::Fiction,
            15.99,
        )
        .into_book(3),
    ]
}
