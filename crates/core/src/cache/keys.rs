use uuid::Uuid;

/// Returns the cache key for a user's note list snapshot.
pub fn notes_key(user_id: Uuid) -> String {
    format!("notes.user.{}", user_id)
}

/// Returns the cache key marking a token id as revoked.
pub fn revoked_token_key(jti: &str) -> String {
    format!("auth.revoked.{}", jti)
}
