//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, health, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblioteca API",
        version = "0.1.0",
        description = "Library catalog REST API: authors, books, search and statistics",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Authors
        authors::list_authors,
        authors::create_author,
        authors::get_author,
        authors::update_author,
        authors::delete_author,
        authors::author_books,
        authors::author_stats,
        // Books
        books::list_books,
        books::create_book,
        books::get_book,
        books::update_book,
        books::delete_book,
        books::search_books,
        books::book_filters,
        // Stats
        stats::catalog_stats,
    ),
    components(
        schemas(
            // Authors
            crate::models::Author,
            crate::models::AuthorSummary,
            crate::models::AuthorDetail,
            crate::models::author::BookCount,
            crate::models::AuthorBooks,
            crate::models::AuthorDraft,
            crate::models::UpdateAuthor,
            // Books
            crate::models::Book,
            crate::models::BookDetail,
            crate::models::BookListing,
            crate::models::BookDraft,
            crate::models::UpdateBook,
            crate::models::BookFilter,
            // Search
            crate::models::SearchResponse,
            crate::models::Pagination,
            crate::models::SortField,
            crate::models::SortOrder,
            crate::models::FilterOptions,
            // Stats
            crate::models::AuthorStats,
            crate::models::BookYear,
            crate::models::BookPages,
            crate::models::CatalogStats,
            // Health
            health::HealthResponse,
            // Responses
            crate::api::MessageResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "authors", description = "Author management"),
        (name = "books", description = "Book management and search"),
        (name = "stats", description = "Statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
