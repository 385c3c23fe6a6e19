//! Books repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, FromRow, Pool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use super::{contains_pattern, push_assignment, write_error, BookStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        Author, AuthorSummary, Book, BookDetail, BookFilter, BookListing, BookSearch, NewBook,
        SortOrder, UpdateBook,
    },
};

const BOOK_COLUMNS: &str = "b.id, b.title, b.description, b.isbn, b.published_year, b.genre, \
                            b.pages, b.author_id, b.created_at, b.updated_at";

const ISBN_TAKEN: &str = "El ISBN ya existe";
const AUTHOR_MISSING: &str = "El autor especificado no existe";

/// Read a book row carrying `author_name` and, optionally, `author_email`.
fn listing_from_row(row: &PgRow, with_email: bool) -> Result<BookListing, sqlx::Error> {
    let book = Book::from_row(row)?;
    let author = AuthorSummary {
        id: book.author_id.clone(),
        name: row.try_get("author_name")?,
        email: if with_email {
            row.try_get("author_email")?
        } else {
            None
        },
    };
    Ok(BookListing { book, author })
}

/// Append the WHERE clause of a search. Every active condition is ANDed.
fn push_search_filters(qb: &mut QueryBuilder<'_, Postgres>, search: &BookSearch) {
    qb.push(" WHERE TRUE");
    if let Some(ref term) = search.search {
        qb.push(" AND b.title ILIKE ").push_bind(contains_pattern(term));
    }
    if let Some(ref genre) = search.genre {
        qb.push(" AND b.genre = ").push_bind(genre.clone());
    }
    if let Some(ref name) = search.author_name {
        qb.push(" AND a.name ILIKE ").push_bind(contains_pattern(name));
    }
}

pub(crate) fn search_count_query(search: &BookSearch) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM books b JOIN authors a ON a.id = b.author_id");
    push_search_filters(&mut qb, search);
    qb
}

pub(crate) fn search_page_query(search: &BookSearch) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT ");
    qb.push(BOOK_COLUMNS)
        .push(", a.name AS author_name FROM books b JOIN authors a ON a.id = b.author_id");
    push_search_filters(&mut qb, search);
    qb.push(format!(
        " ORDER BY {} {}, b.id ASC",
        search.sort_by.column(),
        search.order.as_sql()
    ));
    qb.push(" LIMIT ").push_bind(search.limit);
    qb.push(" OFFSET ").push_bind(search.offset());
    qb
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn list(&self, filter: &BookFilter) -> AppResult<Vec<BookListing>> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT ");
        qb.push(BOOK_COLUMNS).push(
            ", a.name AS author_name, a.email AS author_email \
             FROM books b JOIN authors a ON a.id = b.author_id WHERE TRUE",
        );
        if let Some(ref genre) = filter.genre {
            qb.push(" AND b.genre = ").push_bind(genre.clone());
        }
        if let Some(ref author_id) = filter.author_id {
            qb.push(" AND b.author_id = ").push_bind(author_id.clone());
        }
        qb.push(" ORDER BY b.created_at DESC, b.id ASC");

        let rows = qb.build().fetch_all(&self.pool).await?;
        let books = rows
            .iter()
            .map(|row| listing_from_row(row, true))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(books)
    }

    async fn list_by_author(&self, author_id: &str, order: SortOrder) -> AppResult<Vec<Book>> {
        let query = format!(
            "SELECT {} FROM books b WHERE b.author_id = $1 \
             ORDER BY b.published_year {dir}, b.created_at {dir}, b.id ASC",
            BOOK_COLUMNS,
            dir = order.as_sql()
        );
        let books = sqlx::query_as::<_, Book>(&query)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    async fn get(&self, id: &str) -> AppResult<Option<BookDetail>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books b WHERE b.id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(book) = book else {
            return Ok(None);
        };

        let author = sqlx::query_as::<_, Author>(
            r#"
            SELECT id, name, email, bio, nationality, birth_year, created_at, updated_at
            FROM authors
            WHERE id = $1
            "#,
        )
        .bind(&book.author_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Some(BookDetail { book, author }))
    }

    async fn create(&self, book: &NewBook) -> AppResult<BookDetail> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO books (
                id, title, description, isbn, published_year, genre, pages,
                author_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&id)
        .bind(&book.title)
        .bind(&book.description)
        .bind(&book.isbn)
        .bind(book.published_year)
        .bind(&book.genre)
        .bind(book.pages)
        .bind(&book.author_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, ISBN_TAKEN, AUTHOR_MISSING))?;

        self.get(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("Libro no encontrado".to_string()))
    }

    async fn update(&self, id: &str, changes: &UpdateBook) -> AppResult<Option<BookDetail>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE books SET updated_at = ");
        qb.push_bind(Utc::now());
        push_assignment(&mut qb, "title", &changes.title);
        push_assignment(&mut qb, "description", &changes.description);
        push_assignment(&mut qb, "isbn", &changes.isbn);
        push_assignment(&mut qb, "published_year", &changes.published_year);
        push_assignment(&mut qb, "genre", &changes.genre);
        push_assignment(&mut qb, "pages", &changes.pages);
        push_assignment(&mut qb, "author_id", &changes.author_id);
        qb.push(" WHERE id = ").push_bind(id.to_string());

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, ISBN_TAKEN, AUTHOR_MISSING))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn search(&self, search: &BookSearch) -> AppResult<(Vec<BookListing>, i64)> {
        let total: i64 = search_count_query(search)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let rows = search_page_query(search)
            .build()
            .fetch_all(&self.pool)
            .await?;
        let books = rows
            .iter()
            .map(|row| listing_from_row(row, false))
            .collect::<Result<Vec<_>, _>>()?;

        Ok((books, total))
    }

    async fn distinct_genres(&self) -> AppResult<Vec<String>> {
        let genres = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT genre FROM books WHERE genre IS NOT NULL ORDER BY genre",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(genres)
    }

    async fn distinct_years(&self) -> AppResult<Vec<i32>> {
        let years = sqlx::query_scalar::<_, i32>(
            "SELECT DISTINCT published_year FROM books \
             WHERE published_year IS NOT NULL ORDER BY published_year DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(years)
    }

    async fn count(&self) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
