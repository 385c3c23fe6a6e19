//! Book search parameters and pagination

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::book::BookListing;
use crate::error::{AppError, AppResult};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 50;

/// Columns a search may be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Title,
    Description,
    Isbn,
    PublishedYear,
    Genre,
    Pages,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    pub fn column(self) -> &'static str {
        match self {
            SortField::Title => "b.title",
            SortField::Description => "b.description",
            SortField::Isbn => "b.isbn",
            SortField::PublishedYear => "b.published_year",
            SortField::Genre => "b.genre",
            SortField::Pages => "b.pages",
            SortField::CreatedAt => "b.created_at",
            SortField::UpdatedAt => "b.updated_at",
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SortField::Title),
            "description" => Ok(SortField::Description),
            "isbn" => Ok(SortField::Isbn),
            "publishedYear" => Ok(SortField::PublishedYear),
            "genre" => Ok(SortField::Genre),
            "pages" => Ok(SortField::Pages),
            "createdAt" => Ok(SortField::CreatedAt),
            "updatedAt" => Ok(SortField::UpdatedAt),
            _ => Err(AppError::Validation(
                "Campo de ordenamiento no válido".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(AppError::Validation("Orden no válido".to_string())),
        }
    }
}

/// Raw `/books/search` query string. Every value arrives as text and an empty
/// value is treated like a missing one.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookSearchQuery {
    /// Case-insensitive substring of the title
    pub search: Option<String>,
    /// Exact genre
    pub genre: Option<String>,
    /// Case-insensitive substring of the author's name
    pub author_name: Option<String>,
    /// 1-based page number (default 1)
    pub page: Option<String>,
    /// Page size (default 10, at most 50)
    pub limit: Option<String>,
    /// Sort field (default createdAt)
    pub sort_by: Option<String>,
    /// asc or desc (default desc)
    pub order: Option<String>,
}

/// Normalized search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSearch {
    pub search: Option<String>,
    pub genre: Option<String>,
    pub author_name: Option<String>,
    pub page: i64,
    pub limit: i64,
    pub sort_by: SortField,
    pub order: SortOrder,
}

impl Default for BookSearch {
    fn default() -> Self {
        Self {
            search: None,
            genre: None,
            author_name: None,
            page: 1,
            limit: DEFAULT_LIMIT,
            sort_by: SortField::default(),
            order: SortOrder::default(),
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_int(value: Option<String>, default: i64) -> AppResult<i64> {
    match present(value) {
        None => Ok(default),
        Some(v) => v.trim().parse::<i64>().map_err(|_| {
            AppError::Validation("Parámetros de paginación no válidos".to_string())
        }),
    }
}

impl BookSearchQuery {
    /// Apply defaults and bounds. `limit` is capped but never floored, and
    /// `page` is not range checked.
    pub fn into_search(self) -> AppResult<BookSearch> {
        let sort_by = match present(self.sort_by) {
            Some(field) => field.parse()?,
            None => SortField::default(),
        };
        let order = match present(self.order) {
            Some(order) => order.parse()?,
            None => SortOrder::default(),
        };

        Ok(BookSearch {
            search: present(self.search),
            genre: present(self.genre),
            author_name: present(self.author_name),
            page: parse_int(self.page, 1)?,
            limit: parse_int(self.limit, DEFAULT_LIMIT)?.min(MAX_LIMIT),
            sort_by,
            order,
        })
    }
}

impl BookSearch {
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Pagination metadata of a search page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page.saturating_mul(limit) < total,
            has_prev: page > 1,
        }
    }
}

/// One page of search results
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SearchResponse {
    pub data: Vec<BookListing>,
    pub pagination: Pagination,
}
