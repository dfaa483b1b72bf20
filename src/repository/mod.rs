//! Repository layer for catalog storage

pub mod books;

use std::time::Duration;

use crate::config::CatalogConfig;

/// Main repository struct holding the shared stores
#[derive(Clone)]
pub struct Repository {
    pub books: books::BooksRepository,
}

impl Repository {
    /// Create a new repository from the catalog configuration
    pub fn new(config: &CatalogConfig) -> Self {
        let search_delay = Duration::from_millis(config.search_delay_ms);
        let books = if config.seed_sample_data {
            books::BooksRepository::with_sample_data(search_delay)
        } else {
            books::BooksRepository::new(search_delay)
        };
        Self { books }
    }
}
