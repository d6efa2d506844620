//! Application state shared by every handler.
//!
//! Storage and cache backends are chosen at compile time; each supported
//! combination gets its own `AppState::new` below.

use std::sync::Arc;

use quicknotes_auth::{AuthConfig, AuthState};
use quicknotes_core::cache::Cache;
use quicknotes_core::storage::{NoteRepository, UserRepository};

use crate::cache::NoteListCache;
use crate::config::Config;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Note store (in-memory or SQLite)
    pub notes: Arc<dyn NoteRepository>,
    /// Per-user note list snapshots
    pub note_cache: NoteListCache,
    /// Users, tokens and revocations
    pub auth: AuthState,
}

impl AppState {
    /// Wires a repository that stores both notes and users to its caches.
    ///
    /// `revocations` holds logged-out token ids. It must not evict live
    /// entries, so it is kept apart from a size-bounded note list cache.
    fn build<R>(
        repo: Arc<R>,
        note_lists: Arc<dyn Cache>,
        revocations: Arc<dyn Cache>,
        config: &Config,
        auth_config: AuthConfig,
    ) -> Self
    where
        R: NoteRepository + UserRepository + 'static,
    {
        let notes: Arc<dyn NoteRepository> = repo.clone();
        let users: Arc<dyn UserRepository> = repo;

        Self {
            notes,
            note_cache: NoteListCache::new(note_lists, config.cache_ttl()),
            auth: AuthState::new(users, revocations, auth_config),
        }
    }

    /// Pairs `repo` with in-process caches: an LRU bounded by
    /// `cache_max_entries` for note lists and an unbounded TTL store for
    /// revocations.
    #[cfg(any(feature = "memory", test))]
    fn with_memory_caches<R>(repo: Arc<R>, config: &Config, auth_config: AuthConfig) -> Self
    where
        R: NoteRepository + UserRepository + 'static,
    {
        use crate::cache::MemoryCache;

        Self::build(
            repo,
            Arc::new(MemoryCache::new(config.cache_max_entries)),
            Arc::new(MemoryCache::unbounded()),
            config,
            auth_config,
        )
    }

    /// Pairs `repo` with one Redis connection for both uses. Redis does not
    /// evict keys under its default `noeviction` policy.
    #[cfg(feature = "redis")]
    fn with_redis_cache<R>(
        repo: Arc<R>,
        cache: crate::cache::RedisCache,
        config: &Config,
        auth_config: AuthConfig,
    ) -> Self
    where
        R: NoteRepository + UserRepository + 'static,
    {
        let cache: Arc<dyn Cache> = Arc::new(cache);
        Self::build(repo, cache.clone(), cache, config, auth_config)
    }
}

/// Lets the auth routes and the `CurrentUser` extractor pull their state out of `AppState`.
impl AsRef<AuthState> for AppState {
    fn as_ref(&self) -> &AuthState {
        &self.auth
    }
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(all(feature = "inmemory", feature = "memory"))]
mod inmemory_memory {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and cache.
        /// Useful for development without any external dependencies.
        pub async fn new(config: &Config, auth_config: AuthConfig) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(InMemoryRepository::new());

            tracing::info!("Using in-memory storage with in-memory cache");
            Ok(Self::with_memory_caches(repo, config, auth_config))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "redis"))]
mod inmemory_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState with in-memory storage and Redis cache.
        pub async fn new(config: &Config, auth_config: AuthConfig) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(InMemoryRepository::new());
            let cache = RedisCache::new(&config.redis_url).await?;

            tracing::info!(redis_url = %config.redis_url, "Using in-memory storage with Redis cache");
            Ok(Self::with_redis_cache(repo, cache, config, auth_config))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "memory"))]
mod sqlite_memory {
    use super::*;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and in-memory cache.
        pub async fn new(config: &Config, auth_config: AuthConfig) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);

            tracing::info!(path = %config.sqlite_path, "Using SQLite storage with in-memory cache");
            Ok(Self::with_memory_caches(repo, config, auth_config))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "redis"))]
mod sqlite_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState with SQLite storage and Redis cache.
        pub async fn new(config: &Config, auth_config: AuthConfig) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);
            let cache = RedisCache::new(&config.redis_url).await?;

            tracing::info!(
                path = %config.sqlite_path,
                redis_url = %config.redis_url,
                "Using SQLite storage with Redis cache"
            );
            Ok(Self::with_redis_cache(repo, cache, config, auth_config))
        }
    }
}

#[cfg(test)]
mod test_support {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// In-memory backends with a cheap bcrypt cost.
        pub fn for_tests(config: &Config) -> Self {
            let auth_config = AuthConfig::new("test-secret").with_bcrypt_cost(4);
            Self::with_memory_caches(Arc::new(InMemoryRepository::new()), config, auth_config)
        }
    }

    impl Default for AppState {
        fn default() -> Self {
            Self::for_tests(&Config::default())
        }
    }
}
