//! Authors repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::{push_assignment, write_error, AuthorStore};
use crate::{
    error::AppResult,
    models::{Author, AuthorSummary, NewAuthor, UpdateAuthor},
};

const AUTHOR_COLUMNS: &str =
    "id, name, email, bio, nationality, birth_year, created_at, updated_at";

const EMAIL_TAKEN: &str = "El email ya está registrado";

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorStore for AuthorsRepository {
    async fn list(&self) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors ORDER BY name ASC, id ASC",
            AUTHOR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    async fn get(&self, id: &str) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors WHERE id = $1",
            AUTHOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(author)
    }

    async fn exists(&self, id: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM authors WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn create(&self, author: &NewAuthor) -> AppResult<Author> {
        let now = Utc::now();

        let created = sqlx::query_as::<_, Author>(&format!(
            r#"
            INSERT INTO authors (id, name, email, bio, nationality, birth_year, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        ))
        .bind(Uuid::new_v4().to_string())
        .bind(&author.name)
        .bind(&author.email)
        .bind(&author.bio)
        .bind(&author.nationality)
        .bind(author.birth_year)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, EMAIL_TAKEN, EMAIL_TAKEN))?;

        Ok(created)
    }

    async fn update(&self, id: &str, changes: &UpdateAuthor) -> AppResult<Option<Author>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE authors SET updated_at = ");
        qb.push_bind(Utc::now());
        push_assignment(&mut qb, "name", &changes.name);
        push_assignment(&mut qb, "email", &changes.email);
        push_assignment(&mut qb, "bio", &changes.bio);
        push_assignment(&mut qb, "nationality", &changes.nationality);
        push_assignment(&mut qb, "birth_year", &changes.birth_year);
        qb.push(" WHERE id = ").push_bind(id.to_string());
        qb.push(" RETURNING ").push(AUTHOR_COLUMNS);

        let updated = qb
            .build_query_as::<Author>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| write_error(e, EMAIL_TAKEN, EMAIL_TAKEN))?;

        Ok(updated)
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_summaries(&self) -> AppResult<Vec<AuthorSummary>> {
        let authors = sqlx::query_as::<_, AuthorSummary>(
            "SELECT id, name FROM authors ORDER BY name ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    async fn count(&self) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }
}
