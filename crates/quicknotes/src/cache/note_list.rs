//! Time-boxed snapshots of each user's note list.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use quicknotes_core::cache::{self, deserialize_notes, notes_key, serialize_notes, Cache};
use quicknotes_core::note::Note;
use quicknotes_core::storage;

/// Cache-aside wrapper for note lists, keyed by owner.
///
/// - **Reads**: serve the snapshot if present, otherwise load, store with
///   the TTL and return. A cache that cannot be read or written only costs
///   a trip to the store.
/// - **Writes**: callers invalidate after every successful mutation. Failing
///   to invalidate is an error, since the stale list would be served until
///   the TTL runs out.
#[derive(Clone)]
pub struct NoteListCache {
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl NoteListCache {
    pub fn new(cache: Arc<dyn Cache>, ttl: Duration) -> Self {
        Self { cache, ttl }
    }

    /// Returns the cached list for `user_id`, filling it from `loader` on a miss.
    pub async fn get_or_load<F, Fut>(&self, user_id: Uuid, loader: F) -> storage::Result<Vec<Note>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = storage::Result<Vec<Note>>>,
    {
        let cache_key = notes_key(user_id);

        match self.cache.get(&cache_key).await {
            Ok(Some(bytes)) => match deserialize_notes(&bytes) {
                Ok(notes) => {
                    tracing::trace!(%user_id, count = notes.len(), "Cache hit for note list");
                    return Ok(notes);
                }
                // Deserialization failed - treat as cache miss
                Err(err) => {
                    tracing::warn!(%user_id, error = %err, "Cached note list is unreadable")
                }
            },
            Ok(None) => {}
            Err(err) => tracing::warn!(%user_id, error = %err, "Note list cache read failed"),
        }

        tracing::trace!(%user_id, "Cache miss for note list");
        let notes = loader().await?;

        match serialize_notes(&notes) {
            Ok(bytes) => {
                if let Err(err) = self.cache.set(&cache_key, &bytes, Some(self.ttl)).await {
                    tracing::warn!(%user_id, error = %err, "Failed to cache note list");
                }
            }
            Err(err) => tracing::warn!(%user_id, error = %err, "Failed to serialize note list"),
        }

        Ok(notes)
    }

    /// Drops the snapshot for `user_id`. Idempotent.
    pub async fn invalidate(&self, user_id: Uuid) -> cache::Result<()> {
        self.cache.delete(&notes_key(user_id)).await?;
        tracing::trace!(%user_id, "Invalidated note list cache");
        Ok(())
    }
}
