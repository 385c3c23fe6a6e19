//! Error types for Biblioteca server

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Closed set of failure kinds every storage backend maps into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
    Unknown,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unclassified failure reported to the client with a fixed message.
    #[error("{message}")]
    Failure {
        message: &'static str,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::Database(_) | AppError::Failure { .. } => ErrorKind::Unknown,
        }
    }
}

/// Replaces unclassified errors with an endpoint specific message.
///
/// Not-found, conflict and validation errors already carry a client facing
/// message and pass through untouched.
pub trait FailureContext<T> {
    fn or_failure(self, message: &'static str) -> AppResult<T>;
}

impl<T> FailureContext<T> for AppResult<T> {
    fn or_failure(self, message: &'static str) -> AppResult<T> {
        self.map_err(|err| match err.kind() {
            ErrorKind::Unknown => AppError::Failure {
                message,
                source: Box::new(err),
            },
            _ => err,
        })
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.kind().status();
        let message = match self {
            AppError::NotFound(msg) | AppError::Validation(msg) | AppError::Conflict(msg) => msg,
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Error interno del servidor".to_string()
            }
            AppError::Failure { message, source } => {
                tracing::error!("{}: {:?}", message, source);
                message.to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!(
            "Cuerpo de la petición inválido: {}",
            rejection.body_text()
        ))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(format!(
            "Parámetros de consulta inválidos: {}",
            rejection.body_text()
        ))
    }
}

/// Report the first failing field, in the order the fields are listed.
pub fn first_violation(errors: &ValidationErrors, field_order: &[&'static str]) -> AppError {
    let fields = errors.field_errors();
    let message = field_order
        .iter()
        .filter_map(|field| fields.get(field).copied())
        .chain(fields.values().copied())
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Datos no válidos".to_string());
    AppError::Validation(message)
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_to_status() {
        assert_eq!(
            AppError::NotFound("x".into()).kind().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("x".into()).kind().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Validation("x".into()).kind().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database(sqlx::Error::PoolTimedOut).kind(),
            ErrorKind::Unknown
        );
    }

    #[test]
    fn test_or_failure_only_wraps_unknown() {
        let failed: AppResult<()> = Err(AppError::Database(sqlx::Error::PoolClosed));
        match failed.or_failure("Error al obtener libro") {
            Err(AppError::Failure { message, .. }) => assert_eq!(message, "Error al obtener libro"),
            other => panic!("unexpected: {:?}", other),
        }

        let missing: AppResult<()> = Err(AppError::NotFound("Libro no encontrado".into()));
        match missing.or_failure("Error al obtener libro") {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Libro no encontrado"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failure_hides_details() {
        let err = AppError::Failure {
            message: "Error al eliminar autor",
            source: Box::new(AppError::Database(sqlx::Error::PoolClosed)),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Error al eliminar autor");
    }
}
