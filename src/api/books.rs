//! Books API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppResult, FailureContext},
    models::{
        BookDetail, BookDraft, BookFilter, BookListing, BookSearchQuery, FilterOptions,
        SearchResponse, UpdateBook,
    },
    AppState,
};

use super::{ApiJson, ApiQuery, MessageResponse};

/// List books, most recently added first
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookFilter),
    responses(
        (status = 200, description = "Books with their author", body = Vec<BookListing>),
        (status = 500, description = "Store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<BookFilter>,
) -> AppResult<Json<Vec<BookListing>>> {
    let books = state
        .services
        .books
        .list(filter)
        .await
        .or_failure("Error al obtener libros")?;
    Ok(Json(books))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookDraft,
    responses(
        (status = 201, description = "Book created", body = BookDetail),
        (status = 400, description = "Invalid book", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown author", body = crate::error::ErrorResponse),
        (status = 409, description = "ISBN already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<BookDraft>,
) -> AppResult<(StatusCode, Json<BookDetail>)> {
    let book = state
        .services
        .books
        .create(draft)
        .await
        .or_failure("Error al crear libro")?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Get a book with its author
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetail),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookDetail>> {
    let book = state
        .services
        .books
        .get(&id)
        .await
        .or_failure("Error al obtener libro")?;
    Ok(Json(book))
}

/// Update the supplied fields of a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = BookDetail),
        (status = 400, description = "Invalid field", body = crate::error::ErrorResponse),
        (status = 404, description = "Book or author not found", body = crate::error::ErrorResponse),
        (status = 409, description = "ISBN already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(changes): ApiJson<UpdateBook>,
) -> AppResult<Json<BookDetail>> {
    let book = state
        .services
        .books
        .update(&id, changes)
        .await
        .or_failure("Error al actualizar el libro")?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .books
        .delete(&id)
        .await
        .or_failure("Error al eliminar el libro")?;
    Ok(Json(MessageResponse::new("Libro eliminado correctamente")))
}

/// Search, sort and paginate books
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(BookSearchQuery),
    responses(
        (status = 200, description = "One page of results", body = SearchResponse),
        (status = 400, description = "Invalid sort or paging parameter", body = crate::error::ErrorResponse),
        (status = 500, description = "Store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<BookSearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let page = state
        .services
        .books
        .search(query)
        .await
        .or_failure("Error en búsqueda de libros")?;
    Ok(Json(page))
}

/// Values for the search filters
#[utoipa::path(
    get,
    path = "/books/filters",
    tag = "books",
    responses(
        (status = 200, description = "Genres, authors and years", body = FilterOptions),
        (status = 500, description = "Store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn book_filters(State(state): State<AppState>) -> AppResult<Json<FilterOptions>> {
    let filters = state
        .services
        .books
        .filters()
        .await
        .or_failure("Error cargando filtros")?;
    Ok(Json(filters))
}
