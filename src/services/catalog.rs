//! Catalog service

use tokio::{sync::mpsc, task::JoinHandle};
use tokio_stream::wrappers::ReceiverStream;

use crate::{
    models::{Book, Category, CreateBook, SearchQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_book(&self, id: i64) -> Option<Book> {
        self.repository.books.get(id).await
    }

    pub async fn list_books(&self) -> Vec<Book> {
        self.repository.books.list().await
    }

    pub async fn find_books_by_category(&self, category: Category) -> Vec<Book> {
        self.repository.books.find_by_category(category).await
    }

    /// Start a search and return its results as a stream.
    ///
    /// Results are produced by a background task feeding a channel with room
    /// for a single book, so the next book is not produced until the
    /// previous one has been taken. Dropping the stream stops the task.
    pub fn search_books(&self, query: SearchQuery) -> ReceiverStream<Book> {
        let (books, _producer) = self.spawn_search(query);
        books
    }

    /// Spawn the search producer; its handle resolves to the number of
    /// books delivered.
    fn spawn_search(&self, query: SearchQuery) -> (ReceiverStream<Book>, JoinHandle<usize>) {
        let (tx, rx) = mpsc::channel(1);
        let repository = self.repository.clone();

        let producer = tokio::spawn(async move {
            let delivered = repository.books.search(&query, tx).await;
            tracing::debug!(
                "Search for {:?} finished after {} book(s)",
                query.query,
                delivered
            );
            delivered
        });

        (ReceiverStream::new(rx), producer)
    }

    pub async fn create_book(&self, data: CreateBook) -> Book {
        let book = self.repository.books.create(data).await;
        tracing::info!("Created book id={} title={:?}", book.id, book.title);
        book
    }

    /// Number of books in the catalog
    pub async fn count(&self) -> usize {
        self.repository.books.len().await
    }
}
