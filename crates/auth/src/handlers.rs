//! HTTP handlers for auth routes.

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::{CookieJar, WithRejection};
use quicknotes_core::auth::{AuthError as CoreError, IssuedToken};
use quicknotes_core::storage::RepositoryError;
use quicknotes_core::user::{LoginRequest, RegisterRequest, User};
use quicknotes_core::validation::ValidationErrors;
use serde_json::{json, Value};

use crate::error::AuthError;
use crate::extractors::CurrentUser;
use crate::password::{hash_password, verify_password};
use crate::AuthState;

/// JSON request body; syntax and content-type failures become [`AuthError::Body`].
type JsonBody = WithRejection<Json<Value>, AuthError>;

/// Creates the auth router.
///
/// Routes:
/// - `POST /register` - Create an account
/// - `POST /login` - Exchange credentials for a bearer token
/// - `POST /logout` - Revoke the presented token
/// - `GET /me` - Get current authenticated user
pub fn auth_routes<S>() -> Router<S>
where
    AuthState: FromRef<S>,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}

fn email_taken() -> AuthError {
    let mut errors = ValidationErrors::new();
    errors.add("email", "The email has already been taken.");
    errors.into()
}

async fn register(
    State(state): State<AuthState>,
    WithRejection(Json(body), _): JsonBody,
) -> Result<(StatusCode, Json<User>), AuthError> {
    let request = RegisterRequest::from_json(&body)?;

    if state
        .users
        .get_user_by_email(&request.email)
        .await?
        .is_some()
    {
        return Err(email_taken());
    }

    let password_hash = hash_password(request.password, state.config.bcrypt_cost).await?;
    let user = User::new(request.name, request.email, password_hash);

    match state.users.create_user(&user).await {
        Ok(()) => {}
        // Lost a race with a concurrent registration.
        Err(RepositoryError::AlreadyExists { .. }) => return Err(email_taken()),
        Err(e) => return Err(e.into()),
    }

    tracing::info!(user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    WithRejection(Json(body), _): JsonBody,
) -> Result<(CookieJar, Json<IssuedToken>), AuthError> {
    let request = LoginRequest::from_json(&body)?;

    let user = state
        .users
        .get_user_by_email(&request.email)
        .await?
        .ok_or(CoreError::InvalidCredentials)?;

    if !verify_password(request.password, user.password_hash.clone()).await? {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(CoreError::InvalidCredentials.into());
    }

    let (token, _) = state.tokens.issue(user.id)?;

    // Browser clients authenticate through the cookie
    let cookie = Cookie::build((state.config.cookie_name.clone(), token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    tracing::info!(user_id = %user.id, "User logged in");
    Ok((
        jar.add(cookie),
        Json(IssuedToken::bearer(token, state.tokens.ttl_seconds())),
    ))
}

async fn logout(
    State(state): State<AuthState>,
    CurrentUser { user, claims }: CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), AuthError> {
    state.revoke(&claims).await?;

    let jar = jar.remove(Cookie::build(state.config.cookie_name.clone()).path("/"));

    tracing::info!(user_id = %user.id, "User logged out");
    Ok((jar, Json(json!({ "message": "Successfully logged out" }))))
}

async fn me(CurrentUser { user, .. }: CurrentUser) -> Json<User> {
    Json(user)
}
