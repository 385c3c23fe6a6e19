//! Derived statistics. Nothing here is persisted.

use serde::Serialize;
use utoipa::ToSchema;

use super::author::AuthorSummary;

/// Title and publication year of a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookYear {
    pub title: String,
    pub year: Option<i32>,
}

/// Title and page count of a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookPages {
    pub title: String,
    pub pages: Option<i32>,
}

/// Aggregate facts about one author's books
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorStats {
    pub author_id: String,
    pub author_name: String,
    pub total_books: i64,
    pub first_book: Option<BookYear>,
    pub latest_book: Option<BookYear>,
    pub average_pages: Option<i64>,
    /// Distinct genres in first-seen order. A book without a genre
    /// contributes a single `null`.
    pub genres: Vec<Option<String>>,
    pub longest_book: Option<BookPages>,
    pub shortest_book: Option<BookPages>,
}

/// Catalog-wide totals
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total_authors: i64,
    pub total_books: i64,
    /// Rounded to one decimal place
    pub average_books_per_author: f64,
}

/// Values offered by the search form's filter controls
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FilterOptions {
    pub genres: Vec<String>,
    pub authors: Vec<AuthorSummary>,
    /// Newest first
    pub years: Vec<i32>,
}
