use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use quicknotes_auth::AuthError;
use quicknotes_core::cache::CacheError;
use quicknotes_core::storage::RepositoryError;
use quicknotes_core::validation::ValidationErrors;
use serde_json::json;
use thiserror::Error;

/// Errors returned by the note handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, unparsable or not owned by the caller.
    #[error("note not found")]
    NotFound,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

fn message(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "message": message.into() }))).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => message(StatusCode::NOT_FOUND, "Note not found"),
            AppError::Auth(err) => err.into_response(),
            AppError::Body(rejection) => message(rejection.status(), rejection.body_text()),
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "message": errors.summary(), "errors": errors })),
            )
                .into_response(),
            AppError::Repository(err) => {
                tracing::error!("Storage failure: {}", err);
                message(StatusCode::INTERNAL_SERVER_ERROR, "Server Error")
            }
            AppError::Cache(err) => {
                tracing::error!("Cache failure: {}", err);
                message(StatusCode::INTERNAL_SERVER_ERROR, "Server Error")
            }
        }
    }
}
