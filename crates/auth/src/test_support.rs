//! In-process fakes for the user store and cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use quicknotes_core::cache::{self, Cache};
use quicknotes_core::storage::{self, RepositoryError, UserRepository};
use quicknotes_core::user::User;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{AuthConfig, AuthState};

#[derive(Default)]
pub struct FakeUsers {
    users: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserRepository for FakeUsers {
    async fn get_user(&self, id: Uuid) -> storage::Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> storage::Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create_user(&self, user: &User) -> storage::Result<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: user.email.clone(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(())
    }
}

impl FakeUsers {
    pub async fn remove(&self, id: Uuid) {
        self.users.write().await.remove(&id);
    }
}

/// TTLs are ignored.
#[derive(Default)]
pub struct FakeCache {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl Cache for FakeCache {
    async fn get(&self, key: &str) -> cache::Result<Option<Vec<u8>>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8], _ttl: Option<Duration>) -> cache::Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> cache::Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

pub fn test_config() -> AuthConfig {
    AuthConfig::new("test-secret-key-12345").with_bcrypt_cost(4)
}

pub fn test_state() -> AuthState {
    test_state_with(Arc::new(FakeUsers::default()))
}

pub fn test_state_with(users: Arc<FakeUsers>) -> AuthState {
    AuthState::new(users, Arc::new(FakeCache::default()), test_config())
}
