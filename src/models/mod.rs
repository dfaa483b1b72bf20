//! Data models for the book catalog

pub mod book;
pub mod enums;

// Re-export commonly used types
pub use book::{Book, CreateBook, SearchQuery};
pub use enums::Category;
