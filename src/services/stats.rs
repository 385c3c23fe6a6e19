//! Statistics service
//!
//! Author statistics are recomputed from the author's current books on every
//! call; nothing is cached.

use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorStats, Book, BookPages, BookYear, CatalogStats, SortOrder},
    repository::Repository,
};

use super::authors::AUTHOR_NOT_FOUND;

/// Aggregate facts about `books`, which must be ordered by publication year,
/// oldest first.
///
/// Books without a page count weigh 0 in the average and in the search for
/// the longest book, and never count as the shortest one unless no book has
/// a page count. Ties go to the earlier book.
pub fn compute_author_stats(author: &Author, books: &[Book]) -> AuthorStats {
    let (Some(first), Some(last)) = (books.first(), books.last()) else {
        return AuthorStats {
            author_id: author.id.clone(),
            author_name: author.name.clone(),
            total_books: 0,
            first_book: None,
            latest_book: None,
            average_pages: None,
            genres: Vec::new(),
            longest_book: None,
            shortest_book: None,
        };
    };

    let total_pages: i64 = books.iter().map(|b| i64::from(b.pages.unwrap_or(0))).sum();
    let average = total_pages as f64 / books.len() as f64;

    let mut genres: Vec<Option<String>> = Vec::new();
    for book in books {
        if !genres.contains(&book.genre) {
            genres.push(book.genre.clone());
        }
    }

    let longest = books.iter().skip(1).fold(first, |max, b| {
        if b.pages.unwrap_or(0) > max.pages.unwrap_or(0) {
            b
        } else {
            max
        }
    });
    let shortest = books.iter().skip(1).fold(first, |min, b| match (b.pages, min.pages) {
        (Some(p), Some(current)) if p < current => b,
        (Some(_), None) => b,
        _ => min,
    });

    AuthorStats {
        author_id: author.id.clone(),
        author_name: author.name.clone(),
        total_books: books.len() as i64,
        first_book: Some(year_of(first)),
        latest_book: Some(year_of(last)),
        average_pages: Some((average + 0.5).floor() as i64),
        genres,
        longest_book: Some(pages_of(longest)),
        shortest_book: Some(pages_of(shortest)),
    }
}

fn year_of(book: &Book) -> BookYear {
    BookYear {
        title: book.title.clone(),
        year: book.published_year,
    }
}

fn pages_of(book: &Book) -> BookPages {
    BookPages {
        title: book.title.clone(),
        pages: book.pages,
    }
}

/// Books per author, one decimal place
fn books_per_author(total_books: i64, total_authors: i64) -> f64 {
    let ratio = total_books as f64 / total_authors.max(1) as f64;
    (ratio * 10.0).round() / 10.0
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Statistics of one author's books
    pub async fn author_stats(&self, author_id: &str) -> AppResult<AuthorStats> {
        let author = self
            .repository
            .authors
            .get(author_id)
            .await?
            .ok_or_else(|| AppError::NotFound(AUTHOR_NOT_FOUND.to_string()))?;

        let books = self
            .repository
            .books
            .list_by_author(author_id, SortOrder::Asc)
            .await?;

        Ok(compute_author_stats(&author, &books))
    }

    /// Catalog-wide totals
    pub async fn catalog_stats(&self) -> AppResult<CatalogStats> {
        let total_authors = self.repository.authors.count().await?;
        let total_books = self.repository.books.count().await?;

        Ok(CatalogStats {
            total_authors,
            total_books,
            average_books_per_author: books_per_author(total_books, total_authors),
        })
    }
}
