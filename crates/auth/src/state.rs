//! Application state for auth.

use std::sync::Arc;

use axum::extract::FromRef;
use chrono::Utc;
use quicknotes_core::auth::{remaining_lifetime, Claims};
use quicknotes_core::cache::{revoked_token_key, Cache};
use quicknotes_core::storage::UserRepository;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::jwt::TokenIssuer;

/// Marker value stored under a revoked token's key.
const REVOKED_MARKER: &[u8] = b"1";

/// Shared state for auth handlers and the [`CurrentUser`](crate::CurrentUser) extractor.
#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<dyn UserRepository>,
    /// Holds revoked token ids until the token would have expired anyway.
    pub cache: Arc<dyn Cache>,
    pub tokens: TokenIssuer,
    pub config: AuthConfig,
}

impl AuthState {
    pub fn new(users: Arc<dyn UserRepository>, cache: Arc<dyn Cache>, config: AuthConfig) -> Self {
        let tokens = TokenIssuer::new(&config.jwt_secret, config.token_ttl);
        Self {
            users,
            cache,
            tokens,
            config,
        }
    }

    /// Revokes a token for the rest of its lifetime.
    ///
    /// Tokens that have already expired need no marker.
    pub async fn revoke(&self, claims: &Claims) -> Result<(), AuthError> {
        let Some(ttl) = remaining_lifetime(claims, Utc::now()) else {
            return Ok(());
        };

        self.cache
            .set(&revoked_token_key(&claims.jti), REVOKED_MARKER, Some(ttl))
            .await?;

        tracing::debug!(jti = %claims.jti, ttl_secs = ttl.as_secs(), "Revoked access token");
        Ok(())
    }

    pub async fn is_revoked(&self, jti: &str) -> Result<bool, AuthError> {
        Ok(self.cache.get(&revoked_token_key(jti)).await?.is_some())
    }
}

/// Allows AuthState to be extracted from a parent state.
impl<S> FromRef<S> for AuthState
where
    S: AsRef<AuthState>,
{
    fn from_ref(state: &S) -> Self {
        state.as_ref().clone()
    }
}
