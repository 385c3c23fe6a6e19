//! Books service: CRUD, search and filter options

use crate::{
    error::{AppError, AppResult},
    models::{
        BookDetail, BookDraft, BookFilter, BookListing, BookSearchQuery, FilterOptions,
        Pagination, SearchResponse, UpdateBook,
    },
    repository::Repository,
};

pub const BOOK_NOT_FOUND: &str = "Libro no encontrado";
pub const AUTHOR_MISSING: &str = "El autor especificado no existe";

fn not_found() -> AppError {
    AppError::NotFound(BOOK_NOT_FOUND.to_string())
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Books, most recently created first
    pub async fn list(&self, filter: BookFilter) -> AppResult<Vec<BookListing>> {
        self.repository.books.list(&filter.normalized()).await
    }

    pub async fn get(&self, id: &str) -> AppResult<BookDetail> {
        self.repository.books.get(id).await?.ok_or_else(not_found)
    }

    pub async fn create(&self, draft: BookDraft) -> AppResult<BookDetail> {
        let book = draft.validate()?;
        self.ensure_author(&book.author_id).await?;

        let created = self.repository.books.create(&book).await?;
        tracing::info!(book_id = %created.book.id, author_id = %book.author_id, "Book created");
        Ok(created)
    }

    /// Apply a partial update. Fields missing from `changes` keep their value.
    pub async fn update(&self, id: &str, changes: UpdateBook) -> AppResult<BookDetail> {
        let changes = changes.validate()?;
        if let Some(author_id) = changes.author_id.as_set() {
            self.ensure_author(author_id).await?;
        }

        let updated = if changes.is_empty() {
            self.repository.books.get(id).await?
        } else {
            self.repository.books.update(id, &changes).await?
        }
        .ok_or_else(not_found)?;

        tracing::info!(book_id = %id, "Book updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.repository.books.delete(id).await? {
            return Err(not_found());
        }
        tracing::info!(book_id = %id, "Book deleted");
        Ok(())
    }

    /// One page of books matching the query, with pagination metadata
    pub async fn search(&self, query: BookSearchQuery) -> AppResult<SearchResponse> {
        let search = query.into_search()?;
        let (data, total) = self.repository.books.search(&search).await?;

        Ok(SearchResponse {
            data,
            pagination: Pagination::new(search.page, search.limit, total),
        })
    }

    /// Values for the search form's filter controls
    pub async fn filters(&self) -> AppResult<FilterOptions> {
        Ok(FilterOptions {
            genres: self.repository.books.distinct_genres().await?,
            authors: self.repository.authors.list_summaries().await?,
            years: self.repository.books.distinct_years().await?,
        })
    }

    /// Check that the database answers
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.books.ping().await
    }

    async fn ensure_author(&self, author_id: &str) -> AppResult<()> {
        if self.repository.authors.exists(author_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(AUTHOR_MISSING.to_string()))
        }
    }
}
