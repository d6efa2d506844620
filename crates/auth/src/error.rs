use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use quicknotes_core::cache::CacheError;
use quicknotes_core::storage::RepositoryError;
use quicknotes_core::validation::ValidationErrors;
use serde_json::json;
use thiserror::Error;

/// Auth errors for the quicknotes_auth crate.
///
/// Wraps the core `AuthError` and adds the I/O failures the auth handlers
/// and extractor can run into.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Error from the core auth module (token, credential and hashing failures)
    #[error(transparent)]
    Core(#[from] quicknotes_core::auth::AuthError),

    /// Body was not a JSON document
    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),

    /// Rejected request body
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        use quicknotes_core::auth::AuthError as CoreError;

        match self {
            AuthError::Core(CoreError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Invalid credentials" })),
            )
                .into_response(),
            AuthError::Core(ref core_err) if core_err.is_unauthenticated() => {
                tracing::debug!("Rejected request: {}", core_err);
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "message": "Unauthenticated." })),
                )
                    .into_response()
            }
            AuthError::Body(rejection) => (
                rejection.status(),
                Json(json!({ "message": rejection.body_text() })),
            )
                .into_response(),
            AuthError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "message": errors.summary(), "errors": errors })),
            )
                .into_response(),
            err => {
                tracing::error!("Auth error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Server Error" })),
                )
                    .into_response()
            }
        }
    }
}
