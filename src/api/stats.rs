//! Statistics endpoints

use axum::{extract::State, Json};

use crate::{
    error::{AppResult, FailureContext},
    models::CatalogStats,
    AppState,
};

/// Catalog-wide statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Catalog totals", body = CatalogStats),
        (status = 500, description = "Store failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn catalog_stats(State(state): State<AppState>) -> AppResult<Json<CatalogStats>> {
    let stats = state
        .services
        .stats
        .catalog_stats()
        .await
        .or_failure("Error al obtener estadísticas")?;
    Ok(Json(stats))
}
