use async_trait::async_trait;
use uuid::Uuid;

use crate::note::{Note, NoteChanges, NoteKey};
use crate::user::User;

use super::Result;

/// Repository for note operations.
///
/// Single-note operations take a [`NoteKey`] so every lookup is scoped by
/// owner. A note owned by someone else reads exactly like a missing one.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Gets all notes owned by `owner_id`, in insertion order.
    async fn list_notes(&self, owner_id: Uuid) -> Result<Vec<Note>>;

    /// Gets a note by owner and id.
    async fn get_note(&self, key: NoteKey) -> Result<Option<Note>>;

    /// Creates a new note.
    async fn create_note(&self, note: &Note) -> Result<()>;

    /// Applies a partial update and returns the updated note.
    async fn update_note(&self, key: NoteKey, changes: &NoteChanges) -> Result<Option<Note>>;

    /// Deletes a note and returns it as it was before deletion.
    async fn delete_note(&self, key: NoteKey) -> Result<Option<Note>>;
}

/// Repository for user operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by their ID.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Gets a user by their email address.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Creates a new user. Fails with `AlreadyExists` if the email is taken.
    async fn create_user(&self, user: &User) -> Result<()>;
}
