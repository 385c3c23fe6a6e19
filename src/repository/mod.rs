//! Repository layer for database operations
//!
//! Services talk to the catalog through the [`AuthorStore`] and [`BookStore`]
//! traits. The PostgreSQL implementations translate driver failures into the
//! closed [`crate::error::ErrorKind`] set so callers never see driver codes.

pub mod authors;
pub mod books;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::{
        Author, AuthorSummary, Book, BookDetail, BookFilter, BookListing, BookSearch, NewAuthor,
        NewBook, Patch, SortOrder, UpdateAuthor, UpdateBook,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorStore: Send + Sync + 'static {
    /// All authors, by name
    async fn list(&self) -> AppResult<Vec<Author>>;

    async fn get(&self, id: &str) -> AppResult<Option<Author>>;

    async fn exists(&self, id: &str) -> AppResult<bool>;

    async fn create(&self, author: &NewAuthor) -> AppResult<Author>;

    /// Returns `None` when no author has this id
    async fn update(&self, id: &str, changes: &UpdateAuthor) -> AppResult<Option<Author>>;

    /// Returns `false` when no author has this id. Books go with the author.
    async fn delete(&self, id: &str) -> AppResult<bool>;

    /// `{id, name}` of every author, by name
    async fn list_summaries(&self) -> AppResult<Vec<AuthorSummary>>;

    async fn count(&self) -> AppResult<i64>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync + 'static {
    /// Books matching the filter, most recently created first
    async fn list(&self, filter: &BookFilter) -> AppResult<Vec<BookListing>>;

    /// Books of one author ordered by publication year
    async fn list_by_author(&self, author_id: &str, order: SortOrder) -> AppResult<Vec<Book>>;

    async fn get(&self, id: &str) -> AppResult<Option<BookDetail>>;

    async fn create(&self, book: &NewBook) -> AppResult<BookDetail>;

    /// Returns `None` when no book has this id
    async fn update(&self, id: &str, changes: &UpdateBook) -> AppResult<Option<BookDetail>>;

    /// Returns `false` when no book has this id
    async fn delete(&self, id: &str) -> AppResult<bool>;

    /// One page of matching books and the total number of matches
    async fn search(&self, search: &BookSearch) -> AppResult<(Vec<BookListing>, i64)>;

    async fn distinct_genres(&self) -> AppResult<Vec<String>>;

    /// Newest first
    async fn distinct_years(&self) -> AppResult<Vec<i32>>;

    async fn count(&self) -> AppResult<i64>;

    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding the catalog stores
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn AuthorStore>,
    pub books: Arc<dyn BookStore>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(authors::AuthorsRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool)),
        }
    }

    pub fn from_stores(authors: Arc<dyn AuthorStore>, books: Arc<dyn BookStore>) -> Self {
        Self { authors, books }
    }
}

/// Classify a failed write. Unique violations become conflicts and foreign key
/// violations mean the referenced row is gone.
pub(crate) fn write_error(err: sqlx::Error, conflict: &str, missing_reference: &str) -> AppError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::Conflict(conflict.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return AppError::NotFound(missing_reference.to_string());
        }
    }
    AppError::Database(err)
}

/// Append `, column = $n` for a field present in a partial update.
pub(crate) fn push_assignment<'args, T>(
    qb: &mut QueryBuilder<'args, Postgres>,
    column: &str,
    patch: &Patch<T>,
) where
    T: Clone + Send + 'args + sqlx::Encode<'args, Postgres> + sqlx::Type<Postgres>,
{
    if let Some(value) = patch.as_set() {
        qb.push(", ").push(column).push(" = ").push_bind(value.clone());
    }
}

/// `%term%` for ILIKE with the pattern metacharacters escaped.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
