//! bcrypt hashing, run on the blocking pool so request workers stay free.

use quicknotes_core::auth::AuthError as CoreError;

use crate::error::AuthError;

/// Hash a plain-text password with the given bcrypt cost.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| CoreError::Hashing(e.to_string()))?
        .map_err(|e| CoreError::Hashing(e.to_string()).into())
}

/// Check a plain-text password against a stored bcrypt hash.
///
/// A mismatch is `Ok(false)`; a malformed stored hash is an error.
pub async fn verify_password(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| CoreError::Hashing(e.to_string()))?
        .map_err(|e| CoreError::Hashing(e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[tokio::test]
    async fn hash_then_verify() {
        let hash = hash_password("password".into(), TEST_COST).await.unwrap();

        assert_ne!(hash, "password");
        assert!(verify_password("password".into(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong-password".into(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn same_password_gets_distinct_salts() {
        let first = hash_password("password".into(), TEST_COST).await.unwrap();
        let second = hash_password("password".into(), TEST_COST).await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        let result = verify_password("password".into(), "not-a-hash".into()).await;
        assert!(result.is_err());
    }
}
