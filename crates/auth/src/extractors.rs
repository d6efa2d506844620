//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::CookieJar;
use quicknotes_core::auth::{parse_bearer, AuthError as CoreError, Claims};
use quicknotes_core::user::User;

use crate::error::AuthError;
use crate::AuthState;

/// Extractor for the authenticated user. Rejects with 401 if not authenticated.
///
/// The token is read from `Authorization: Bearer <token>`, falling back to
/// the configured cookie for browser clients. Expired, revoked and
/// tampered tokens are rejected, as are tokens whose user no longer exists.
pub struct CurrentUser {
    pub user: User,
    /// Claims of the token that authenticated this request.
    pub claims: Claims,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        // Try Authorization header first (for API clients)
        let token = match parts.headers.get(AUTHORIZATION) {
            Some(value) => {
                let value = value.to_str().map_err(|_| {
                    CoreError::InvalidToken("authorization header is not ASCII".into())
                })?;
                Some(
                    parse_bearer(value)
                        .ok_or_else(|| {
                            CoreError::InvalidToken("expected a bearer token".into())
                        })?
                        .to_string(),
                )
            }
            None => None,
        };

        // Fall back to cookie (for web clients)
        let token = match token {
            Some(token) => token,
            None => CookieJar::from_headers(&parts.headers)
                .get(&auth_state.config.cookie_name)
                .map(|cookie| cookie.value().to_string())
                .ok_or(CoreError::MissingToken)?,
        };

        let claims = auth_state.tokens.verify(&token)?;

        if auth_state.is_revoked(&claims.jti).await? {
            return Err(CoreError::TokenRevoked.into());
        }

        let user_id = claims
            .user_id()
            .ok_or_else(|| CoreError::InvalidToken("subject is not a user id".into()))?;

        let user = auth_state
            .users
            .get_user(user_id)
            .await?
            .ok_or(CoreError::UserNotFound)?;

        Ok(CurrentUser { user, claims })
    }
}
