//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::{
    author::{Author, AuthorSummary},
    patch::{blank_to_none, nullable_int, nullable_int_patch, Patch},
};
use crate::error::{first_violation, AppError, AppResult};

pub const TITLE_TOO_SHORT: &str = "El titulo debe tener al menos 3 carácteres";
pub const PAGES_NOT_POSITIVE: &str = "El número de páginas debe ser mayor a 0";

/// Full book model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub isbn: Option<String>,
    pub published_year: Option<i32>,
    pub genre: Option<String>,
    pub pages: Option<i32>,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book with its full author record
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: Book,
    pub author: Author,
}

/// Book with an abbreviated author, used by listings and search results
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BookListing {
    #[serde(flatten)]
    pub book: Book,
    pub author: AuthorSummary,
}

/// Filters of the plain book listing
#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookFilter {
    /// Exact genre
    pub genre: Option<String>,
    /// Owning author
    pub author_id: Option<String>,
}

impl BookFilter {
    /// Empty query values mean "no filter".
    pub fn normalized(self) -> Self {
        Self {
            genre: blank_to_none(self.genre),
            author_id: blank_to_none(self.author_id),
        }
    }
}

/// Create book request, as submitted by the book form
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub isbn: Option<String>,
    #[serde(default, deserialize_with = "nullable_int")]
    #[schema(value_type = Option<i32>)]
    pub published_year: Option<i32>,
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "nullable_int")]
    #[schema(value_type = Option<i32>)]
    pub pages: Option<i32>,
    pub author_id: Option<String>,
}

/// Validated book, ready to be persisted
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewBook {
    #[validate(length(min = 3, message = "El titulo debe tener al menos 3 carácteres"))]
    pub title: String,
    pub description: Option<String>,
    pub isbn: Option<String>,
    pub published_year: Option<i32>,
    pub genre: Option<String>,
    #[validate(range(min = 1, message = "El número de páginas debe ser mayor a 0"))]
    pub pages: Option<i32>,
    pub author_id: String,
}

impl BookDraft {
    /// Check the form input. Author existence is checked against the store
    /// by the caller.
    pub fn validate(self) -> AppResult<NewBook> {
        let title = self.title.unwrap_or_default();
        let author_id = self.author_id.unwrap_or_default();
        if title.is_empty() || author_id.is_empty() {
            return Err(AppError::Validation(
                "Titulo y autor son requeridos".to_string(),
            ));
        }

        let book = NewBook {
            title,
            description: blank_to_none(self.description),
            isbn: blank_to_none(self.isbn).map(|s| s.trim().to_string()),
            published_year: self.published_year,
            genre: blank_to_none(self.genre),
            pages: self.pages,
            author_id,
        };
        Validate::validate(&book).map_err(|e| first_violation(&e, &["title", "pages"]))?;
        Ok(book)
    }
}

/// Update book request. Only the fields present in the payload change.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub title: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Patch<Option<String>>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub isbn: Patch<Option<String>>,
    #[serde(default, deserialize_with = "nullable_int_patch")]
    #[schema(value_type = Option<i32>)]
    pub published_year: Patch<Option<i32>>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub genre: Patch<Option<String>>,
    #[serde(default, deserialize_with = "nullable_int_patch")]
    #[schema(value_type = Option<i32>)]
    pub pages: Patch<Option<i32>>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub author_id: Patch<String>,
}

impl UpdateBook {
    /// Validate the supplied fields and normalize blank optional text to null.
    pub fn validate(self) -> AppResult<UpdateBook> {
        if let Some(title) = self.title.as_set() {
            if title.chars().count() < 3 {
                return Err(AppError::Validation(TITLE_TOO_SHORT.to_string()));
            }
        }
        if let Some(Some(pages)) = self.pages.as_set() {
            if *pages < 1 {
                return Err(AppError::Validation(PAGES_NOT_POSITIVE.to_string()));
            }
        }

        Ok(UpdateBook {
            description: self.description.map(blank_to_none),
            isbn: self
                .isbn
                .map(|isbn| blank_to_none(isbn).map(|s| s.trim().to_string())),
            genre: self.genre.map(blank_to_none),
            ..self
        })
    }

    pub fn is_empty(&self) -> bool {
        !(self.title.is_set()
            || self.description.is_set()
            || self.isbn.is_set()
            || self.published_year.is_set()
            || self.genre.is_set()
            || self.pages.is_set()
            || self.author_id.is_set())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(value: serde_json::Value) -> BookDraft {
        serde_json::from_value(value).unwrap()
    }

    fn validation_message(err: AppError) -> String {
        match err {
            AppError::Validation(msg) => msg,
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_draft_requires_title_and_author() {
        let err = draft(json!({ "title": "Rayuela" })).validate().unwrap_err();
        assert_eq!(validation_message(err), "Titulo y autor son requeridos");

        let err = draft(json!({ "title": "", "authorId": "a1" })).validate().unwrap_err();
        assert_eq!(validation_message(err), "Titulo y autor son requeridos");
    }

    #[test]
    fn test_draft_rejects_short_title() {
        let err = draft(json!({ "title": "Ab", "authorId": "a1" })).validate().unwrap_err();
        assert_eq!(validation_message(err), TITLE_TOO_SHORT);
    }

    #[test]
    fn test_title_length_counts_characters() {
        let book = draft(json!({ "title": "Año", "authorId": "a1" })).validate().unwrap();
        assert_eq!(book.title, "Año");
    }

    #[test]
    fn test_draft_rejects_non_positive_pages() {
        for pages in [json!(0), json!(-5), json!("0")] {
            let err = draft(json!({ "title": "Rayuela", "authorId": "a1", "pages": pages }))
                .validate()
                .unwrap_err();
            assert_eq!(validation_message(err), PAGES_NOT_POSITIVE);
        }
    }

    #[test]
    fn test_title_error_reported_before_pages() {
        let err = draft(json!({ "title": "Ab", "authorId": "a1", "pages": 0 }))
            .validate()
            .unwrap_err();
        assert_eq!(validation_message(err), TITLE_TOO_SHORT);
    }

    #[test]
    fn test_draft_normalizes_numbers_and_blanks() {
        let book = draft(json!({
            "title": "Cien años de soledad",
            "authorId": "a1",
            "isbn": "",
            "genre": "Novela",
            "publishedYear": "1967",
            "pages": ""
        }))
        .validate()
        .unwrap();

        assert_eq!(book.isbn, None);
        assert_eq!(book.genre.as_deref(), Some("Novela"));
        assert_eq!(book.published_year, Some(1967));
        assert_eq!(book.pages, None);
    }

    #[test]
    fn test_update_only_checks_present_fields() {
        let update: UpdateBook = serde_json::from_value(json!({ "genre": "Cuento" })).unwrap();
        let update = update.validate().unwrap();
        assert_eq!(update.genre, Patch::Set(Some("Cuento".to_string())));
        assert_eq!(update.title, Patch::Absent);
        assert_eq!(update.pages, Patch::Absent);
    }

    #[test]
    fn test_update_rejects_short_title_and_bad_pages() {
        let update: UpdateBook = serde_json::from_value(json!({ "title": "X" })).unwrap();
        assert_eq!(validation_message(update.validate().unwrap_err()), TITLE_TOO_SHORT);

        let update: UpdateBook = serde_json::from_value(json!({ "pages": 0 })).unwrap();
        assert_eq!(
            validation_message(update.validate().unwrap_err()),
            PAGES_NOT_POSITIVE
        );
    }

    #[test]
    fn test_update_empty_pages_clears_value() {
        let update: UpdateBook =
            serde_json::from_value(json!({ "pages": "", "publishedYear": "" })).unwrap();
        let update = update.validate().unwrap();
        assert_eq!(update.pages, Patch::Set(None));
        assert_eq!(update.published_year, Patch::Set(None));
    }

    #[test]
    fn test_filter_ignores_blank_values() {
        let filter = BookFilter {
            genre: Some(String::new()),
            author_id: Some("a1".to_string()),
        }
        .normalized();
        assert_eq!(filter.genre, None);
        assert_eq!(filter.author_id.as_deref(), Some("a1"));
    }

    #[test]
    fn test_listing_flattens_book() {
        let now = Utc::now();
        let listing = BookListing {
            book: Book {
                id: "b1".to_string(),
                title: "Ficciones".to_string(),
                description: None,
                isbn: None,
                published_year: Some(1944),
                genre: Some("Cuento".to_string()),
                pages: Some(174),
                author_id: "a1".to_string(),
                created_at: now,
                updated_at: now,
            },
            author: AuthorSummary {
                id: "a1".to_string(),
                name: "Jorge Luis Borges".to_string(),
                email: None,
            },
        };
        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value["publishedYear"], 1944);
        assert_eq!(value["authorId"], "a1");
        assert_eq!(value["author"]["name"], "Jorge Luis Borges");
        assert!(value["author"].get("email").is_none());
    }
}
