//! Data models for Biblioteca

pub mod author;
pub mod book;
pub mod patch;
pub mod search;
pub mod stats;

// Re-export commonly used types
pub use author::{
    Author, AuthorBooks, AuthorDetail, AuthorDraft, AuthorSummary, NewAuthor, UpdateAuthor,
};
pub use book::{Book, BookDetail, BookDraft, BookFilter, BookListing, NewBook, UpdateBook};
pub use patch::Patch;
pub use search::{BookSearch, BookSearchQuery, Pagination, SearchResponse, SortField, SortOrder};
pub use stats::{AuthorStats, BookPages, BookYear, CatalogStats, FilterOptions};
