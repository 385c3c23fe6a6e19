//! Authors service

use std::{cmp::Ordering, collections::HashMap};

use crate::{
    error::{AppError, AppResult},
    models::{
        Author, AuthorBooks, AuthorDetail, AuthorDraft, Book, BookFilter, SortOrder, UpdateAuthor,
    },
    repository::Repository,
};

pub const AUTHOR_NOT_FOUND: &str = "Autor no encontrado";

fn not_found() -> AppError {
    AppError::NotFound(AUTHOR_NOT_FOUND.to_string())
}

/// Newest publication year first, books without a year before the rest.
fn newest_first(a: &Book, b: &Book) -> Ordering {
    match (a.published_year, b.published_year) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => y.cmp(&x),
    }
}

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Every author with its books, by name
    pub async fn list(&self) -> AppResult<Vec<AuthorDetail>> {
        let authors = self.repository.authors.list().await?;
        let listings = self.repository.books.list(&BookFilter::default()).await?;

        let mut by_author: HashMap<String, Vec<Book>> = HashMap::new();
        for listing in listings {
            by_author
                .entry(listing.book.author_id.clone())
                .or_default()
                .push(listing.book);
        }

        Ok(authors
            .into_iter()
            .map(|author| {
                let mut books = by_author.remove(&author.id).unwrap_or_default();
                books.sort_by(newest_first);
                AuthorDetail::new(author, books)
            })
            .collect())
    }

    /// Author with its books
    pub async fn get(&self, id: &str) -> AppResult<AuthorDetail> {
        let author = self.repository.authors.get(id).await?.ok_or_else(not_found)?;
        self.with_books(author).await
    }

    pub async fn create(&self, draft: AuthorDraft) -> AppResult<Author> {
        let author = draft.validate()?;
        let created = self.repository.authors.create(&author).await?;
        tracing::info!(author_id = %created.id, "Author created");
        Ok(created)
    }

    /// Apply a partial update. Fields missing from `changes` keep their value.
    pub async fn update(&self, id: &str, changes: UpdateAuthor) -> AppResult<AuthorDetail> {
        let changes = changes.validate()?;
        let author = if changes.is_empty() {
            self.repository.authors.get(id).await?
        } else {
            self.repository.authors.update(id, &changes).await?
        }
        .ok_or_else(not_found)?;

        tracing::info!(author_id = %author.id, "Author updated");
        self.with_books(author).await
    }

    /// Delete an author and, through the store, its books
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.repository.authors.delete(id).await? {
            return Err(not_found());
        }
        tracing::info!(author_id = %id, "Author deleted");
        Ok(())
    }

    /// Books of an author, newest first
    pub async fn books(&self, id: &str) -> AppResult<AuthorBooks> {
        let author = self.repository.authors.get(id).await?.ok_or_else(not_found)?;
        let books = self
            .repository
            .books
            .list_by_author(id, SortOrder::Desc)
            .await?;
        Ok(AuthorBooks::new(&author, books))
    }

    async fn with_books(&self, author: Author) -> AppResult<AuthorDetail> {
        let books = self
            .repository
            .books
            .list_by_author(&author.id, SortOrder::Desc)
            .await?;
        Ok(AuthorDetail::new(author, books))
    }
}
