//! Authors API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppResult, FailureContext},
    models::{Author, AuthorBooks, AuthorDetail, AuthorDraft, AuthorStats, UpdateAuthor},
    AppState,
};

use super::{ApiJson, MessageResponse};

/// List authors with their books
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    responses(
        (status = 200, description = "Authors by name", body = Vec<AuthorDetail>),
        (status = 500, description = "Store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<Vec<AuthorDetail>>> {
    let authors = state
        .services
        .authors
        .list()
        .await
        .or_failure("Error al obtener autores")?;
    Ok(Json(authors))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = AuthorDraft,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Missing name or email", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<AuthorDraft>,
) -> AppResult<(StatusCode, Json<Author>)> {
    let author = state
        .services
        .authors
        .create(draft)
        .await
        .or_failure("Error al crear autor")?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Get an author with its books, newest first
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDetail),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AuthorDetail>> {
    let author = state
        .services
        .authors
        .get(&id)
        .await
        .or_failure("Error al obtener autor")?;
    Ok(Json(author))
}

/// Update the supplied fields of an author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = AuthorDetail),
        (status = 400, description = "Invalid field", body = crate::error::ErrorResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(changes): ApiJson<UpdateAuthor>,
) -> AppResult<Json<AuthorDetail>> {
    let author = state
        .services
        .authors
        .update(&id, changes)
        .await
        .or_failure("Error al actualizar autor")?;
    Ok(Json(author))
}

/// Delete an author and its books
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author deleted", body = MessageResponse),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .authors
        .delete(&id)
        .await
        .or_failure("Error al eliminar autor")?;
    Ok(Json(MessageResponse::new("Autor eliminado correctamente")))
}

/// Books of an author, newest first
#[utoipa::path(
    get,
    path = "/authors/{id}/books",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author's books", body = AuthorBooks),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn author_books(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AuthorBooks>> {
    let books = state
        .services
        .authors
        .books(&id)
        .await
        .or_failure("Error al obtener libros del autor")?;
    Ok(Json(books))
}

/// Statistics of an author's books
#[utoipa::path(
    get,
    path = "/authors/{id}/stats",
    tag = "authors",
    params(("id" = String, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author statistics", body = AuthorStats),
        (status = 404, description = "Author not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn author_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AuthorStats>> {
    let stats = state
        .services
        .stats
        .author_stats(&id)
        .await
        .or_failure("Error al obtener estadísticas del autor")?;
    Ok(Json(stats))
}
