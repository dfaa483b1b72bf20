//! Book model and request types

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, NoneAsEmptyString};
use utoipa::{IntoParams, ToSchema};

use super::enums::Category;

/// Catalog record. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    /// Server-assigned identifier
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub category: Category,
    pub price: f64,
}

/// Create book request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateBook {
    /// Ignored: identifiers are always assigned by the server
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub price: f64,
}

impl CreateBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
        category: Category,
        price: f64,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            category,
            price,
        }
    }

    /// Build the stored record under the given identifier.
    pub(crate) fn into_book(self, id: i64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            isbn: self.isbn,
            category: self.category,
            price: self.price,
        }
    }
}

/// Search parameters
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive fragment matched against title and author
    #[serde(default)]
    pub query: String,
    /// Maximum number of results; zero, negative, empty or absent means no limit
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub max_results: Option<i32>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>, max_results: i32) -> Self {
        Self {
            query: query.into(),
            max_results: Some(max_results),
        }
    }

    /// Effective result cap, `None` when unbounded.
    pub fn limit(&self) -> Option<usize> {
        match self.max_results {
            Some(n) if n > 0 => Some(n as usize),
            _ => None,
        }
    }

    /// Whether `book` matches on title or author, ignoring case.
    pub fn matches(&self, book: &Book) -> bool {
        let needle = self.query.to_lowercase();
        book.title.to_lowercase().contains(&needle) || book.author.to_lowercase().contains(&needle)
    }
}
