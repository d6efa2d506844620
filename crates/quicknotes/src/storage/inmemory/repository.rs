//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quicknotes_core::note::{timestamp_now, Note, NoteChanges, NoteKey};
use quicknotes_core::storage::{NoteRepository, RepositoryError, Result, UserRepository};
use quicknotes_core::user::User;

/// In-memory storage backend.
///
/// Notes live in a `Vec` so that listing preserves insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    notes: Arc<RwLock<Vec<Note>>>,
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteRepository for InMemoryRepository {
    async fn list_notes(&self, owner_id: Uuid) -> Result<Vec<Note>> {
        let notes = self.notes.read().await;
        Ok(notes
            .iter()
            .filter(|n| n.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn get_note(&self, key: NoteKey) -> Result<Option<Note>> {
        let notes = self.notes.read().await;
        Ok(notes.iter().find(|n| key.matches(n)).cloned())
    }

    async fn create_note(&self, note: &Note) -> Result<()> {
        let mut notes = self.notes.write().await;
        if notes.iter().any(|n| n.id == note.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Note",
                id: note.id.to_string(),
            });
        }
        notes.push(note.clone());
        Ok(())
    }

    async fn update_note(&self, key: NoteKey, changes: &NoteChanges) -> Result<Option<Note>> {
        let mut notes = self.notes.write().await;
        let Some(note) = notes.iter_mut().find(|n| key.matches(n)) else {
            return Ok(None);
        };
        changes.apply_to(note, timestamp_now());
        Ok(Some(note.clone()))
    }

    async fn delete_note(&self, key: NoteKey) -> Result<Option<Note>> {
        let mut notes = self.notes.write().await;
        Ok(notes
            .iter()
            .position(|n| key.matches(n))
            .map(|index| notes.remove(index)))
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) || users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: user.email.clone(),
            });
        }
        users.insert(user.id, user.clone());
        Ok(())
    }
}
