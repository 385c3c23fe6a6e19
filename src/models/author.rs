//! Author model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{
    book::Book,
    patch::{blank_to_none, nullable_int, nullable_int_patch, Patch},
};
use crate::error::{first_violation, AppError, AppResult};

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: String,
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
    pub nationality: Option<String>,
    pub birth_year: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Author reference embedded in book listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AuthorSummary {
    pub id: String,
    pub name: String,
    /// Only present in the plain book listing
    #[sqlx(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookCount {
    pub books: i64,
}

/// Author with its books, newest publication year first
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorDetail {
    #[serde(flatten)]
    pub author: Author,
    pub books: Vec<Book>,
    #[serde(rename = "_count")]
    pub count: BookCount,
}

impl AuthorDetail {
    pub fn new(author: Author, books: Vec<Book>) -> Self {
        let count = BookCount {
            books: books.len() as i64,
        };
        Self {
            author,
            books,
            count,
        }
    }
}

/// Books of one author, newest publication year first
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorBooks {
    pub author: AuthorSummary,
    pub total_books: i64,
    pub books: Vec<Book>,
}

impl AuthorBooks {
    pub fn new(author: &Author, books: Vec<Book>) -> Self {
        Self {
            author: AuthorSummary {
                id: author.id.clone(),
                name: author.name.clone(),
                email: None,
            },
            total_books: books.len() as i64,
            books,
        }
    }
}

/// Create author request, as submitted by the author form
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub nationality: Option<String>,
    #[serde(default, deserialize_with = "nullable_int")]
    #[schema(value_type = Option<i32>)]
    pub birth_year: Option<i32>,
}

/// Validated author, ready to be persisted
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewAuthor {
    pub name: String,
    #[validate(email(message = "El email no es válido"))]
    pub email: String,
    pub bio: Option<String>,
    pub nationality: Option<String>,
    pub birth_year: Option<i32>,
}

impl AuthorDraft {
    pub fn validate(self) -> AppResult<NewAuthor> {
        let name = self.name.map(|s| s.trim().to_string()).unwrap_or_default();
        let email = self.email.map(|s| s.trim().to_string()).unwrap_or_default();
        if name.is_empty() || email.is_empty() {
            return Err(AppError::Validation(
                "Nombre y email son requeridos".to_string(),
            ));
        }

        let author = NewAuthor {
            name,
            email,
            bio: blank_to_none(self.bio),
            nationality: blank_to_none(self.nationality),
            birth_year: self.birth_year,
        };
        Validate::validate(&author).map_err(|e| first_violation(&e, &["email"]))?;
        Ok(author)
    }
}

/// Update author request. Only the fields present in the payload change.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuthor {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub email: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub bio: Patch<Option<String>>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub nationality: Patch<Option<String>>,
    #[serde(default, deserialize_with = "nullable_int_patch")]
    #[schema(value_type = Option<i32>)]
    pub birth_year: Patch<Option<i32>>,
}

#[derive(Debug, Validate)]
struct EmailCheck {
    #[validate(email(message = "El email no es válido"))]
    email: String,
}

impl UpdateAuthor {
    /// Check the supplied fields and normalize blank optional text to null.
    pub fn validate(self) -> AppResult<UpdateAuthor> {
        let blank = |field: Option<&String>| field.is_some_and(|v| v.trim().is_empty());
        if blank(self.name.as_set()) || blank(self.email.as_set()) {
            return Err(AppError::Validation(
                "Nombre y email son requeridos".to_string(),
            ));
        }
        if let Some(email) = self.email.as_set() {
            EmailCheck {
                email: email.clone(),
            }
            .validate()
            .map_err(|e| first_violation(&e, &["email"]))?;
        }
        Ok(UpdateAuthor {
            bio: self.bio.map(blank_to_none),
            nationality: self.nationality.map(blank_to_none),
            ..self
        })
    }

    pub fn is_empty(&self) -> bool {
        !(self.name.is_set()
            || self.email.is_set()
            || self.bio.is_set()
            || self.nationality.is_set()
            || self.birth_year.is_set())
    }
}
