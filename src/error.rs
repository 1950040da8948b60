use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use thiserror::Error;

/// Failure taxonomy for the API surface. Every known failure mode of a
/// domain mutation maps to one of the first three variants; raw store
/// errors only leak on the admin/introspection surface.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("database error")]
    Database(#[from] DbErr),

    #[error("serialization error")]
    Unexpected(#[from] serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, message),
            ApiError::Database(err) => {
                // A uniqueness check lost to a concurrent insert resurfaces
                // here as a store-level constraint violation; it is still a
                // conflict, not a server fault.
                if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
                    (
                        StatusCode::CONFLICT,
                        "A record with that value already exists".to_string(),
                    )
                } else {
                    tracing::error!("database error: {err}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An unexpected error occurred".to_string(),
                    )
                }
            }
            ApiError::Unexpected(err) => {
                tracing::error!("serialization error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
