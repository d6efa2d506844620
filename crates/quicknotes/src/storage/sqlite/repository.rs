//! SQLite repository implementation.
//!
//! Implements the repository traits from `quicknotes_core::storage` using SQLite.

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use quicknotes_core::note::{timestamp_now, Note, NoteChanges, NoteKey};
use quicknotes_core::storage::{NoteRepository, RepositoryError, Result, UserRepository};
use quicknotes_core::user::User;

use super::conversions::{format_datetime, row_to_note, row_to_user};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based repository implementation.
///
/// All statements run on the single connection owned by `tokio_rusqlite`,
/// so a read-modify-write inside one `call` cannot interleave with another.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;
        tracing::debug!(path, "Opened SQLite database");

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl NoteRepository for SqliteRepository {
    async fn list_notes(&self, owner_id: Uuid) -> Result<Vec<Note>> {
        let owner = owner_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_NOTES_BY_USER)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([&owner], row_to_note).map_err(wrap_err)?;

                let mut notes = Vec::new();
                for row_result in rows {
                    notes.push(row_result.map_err(wrap_err)?);
                }
                Ok(notes)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Note", owner_id.to_string()))
    }

    async fn get_note(&self, key: NoteKey) -> Result<Option<Note>> {
        let owner = key.owner_id.to_string();
        let id = key.note_id.to_string();

        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_NOTE, [&owner, &id], row_to_note)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Note", key.to_string()))
    }

    async fn create_note(&self, note: &Note) -> Result<()> {
        let id = note.id.to_string();
        let user_id = note.user_id.to_string();
        let title = note.title.clone();
        let content = note.content.clone();
        let created_at = format_datetime(&note.created_at);
        let updated_at = format_datetime(&note.updated_at);
        let note_id = note.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_NOTE,
                    rusqlite::params![id, user_id, title, content, created_at, updated_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Note", note_id))
    }

    async fn update_note(&self, key: NoteKey, changes: &NoteChanges) -> Result<Option<Note>> {
        let owner = key.owner_id.to_string();
        let id = key.note_id.to_string();
        let changes = changes.clone();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let Some(mut note) = tx
                    .query_row(schema::SELECT_NOTE, [&owner, &id], row_to_note)
                    .optional()
                    .map_err(wrap_err)?
                else {
                    return Ok(None);
                };

                if !changes.is_empty() {
                    changes.apply_to(&mut note, timestamp_now());
                    tx.execute(
                        schema::UPDATE_NOTE,
                        rusqlite::params![
                            owner,
                            id,
                            note.title,
                            note.content,
                            format_datetime(&note.updated_at)
                        ],
                    )
                    .map_err(wrap_err)?;
                }

                tx.commit().map_err(wrap_err)?;
                Ok(Some(note))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Note", key.to_string()))
    }

    async fn delete_note(&self, key: NoteKey) -> Result<Option<Note>> {
        let owner = key.owner_id.to_string();
        let id = key.note_id.to_string();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let snapshot = tx
                    .query_row(schema::SELECT_NOTE, [&owner, &id], row_to_note)
                    .optional()
                    .map_err(wrap_err)?;

                if snapshot.is_some() {
                    tx.execute(schema::DELETE_NOTE, [&owner, &id])
                        .map_err(wrap_err)?;
                }

                tx.commit().map_err(wrap_err)?;
                Ok(snapshot)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Note", key.to_string()))
    }
}

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_USER_BY_ID, [&id_str], row_to_user)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", id.to_string()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_string();
        let user_email = email.clone();

        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_USER_BY_EMAIL, [&email], row_to_user)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", user_email))
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let id = user.id.to_string();
        let name = user.name.clone();
        let email = user.email.clone();
        let password_hash = user.password_hash.clone();
        let created_at = format_datetime(&user.created_at);
        let updated_at = format_datetime(&user.updated_at);
        let user_email = user.email.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_USER,
                    rusqlite::params![id, name, email, password_hash, created_at, updated_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User", user_email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repo_with_user() -> (SqliteRepository, User) {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let user = User::new("Test User", "test@example.com", "$2b$04$hash");
        repo.create_user(&user).await.unwrap();
        (repo, user)
    }

    #[tokio::test]
    async fn test_user_round_trip_keeps_password_hash() {
        let (repo, user) = repo_with_user().await;

        let by_id = repo.get_user(user.id).await.unwrap();
        let by_email = repo.get_user_by_email(&user.email).await.unwrap();

        assert_eq!(by_id, Some(user.clone()));
        assert_eq!(by_email, Some(user));
    }

    #[tokio::test]
    async fn test_duplicate_email_is_already_exists() {
        let (repo, _) = repo_with_user().await;
        let twin = User::new("Twin", "test@example.com", "hash");

        let result = repo.create_user(&twin).await;

        assert_eq!(
            result,
            Err(RepositoryError::AlreadyExists {
                entity_type: "User",
                id: "test@example.com".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let (repo, user) = repo_with_user().await;
        let notes: Vec<Note> = ["c", "a", "b"]
            .into_iter()
            .map(|title| Note::new(user.id, title, "body"))
            .collect();
        for note in &notes {
            repo.create_note(note).await.unwrap();
        }

        assert_eq!(repo.list_notes(user.id).await.unwrap(), notes);
    }

    #[tokio::test]
    async fn test_get_note_is_owner_scoped() {
        let (repo, user) = repo_with_user().await;
        let other = User::new("Other", "other@example.com", "hash");
        repo.create_user(&other).await.unwrap();
        let note = Note::new(user.id, "Private", "p");
        repo.create_note(&note).await.unwrap();

        assert_eq!(repo.get_note(note.key()).await.unwrap(), Some(note.clone()));
        assert!(repo
            .get_note(NoteKey::new(other.id, note.id))
            .await
            .unwrap()
            .is_none());
        assert!(repo.list_notes(other.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_note_for_unknown_user_violates_foreign_key() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();

        let result = repo
            .create_note(&Note::new(Uuid::new_v4(), "Orphan", "o"))
            .await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_update_title_only() {
        let (repo, user) = repo_with_user().await;
        let note = Note::new(user.id, "Test Note", "Content");
        repo.create_note(&note).await.unwrap();

        let updated = repo
            .update_note(note.key(), &NoteChanges::new().with_title("X"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "X");
        assert_eq!(updated.content, "Content");
        assert!(updated.updated_at > note.updated_at);
        assert_eq!(repo.get_note(note.key()).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_empty_update_leaves_note_untouched() {
        let (repo, user) = repo_with_user().await;
        let note = Note::new(user.id, "Same", "same");
        repo.create_note(&note).await.unwrap();

        let result = repo
            .update_note(note.key(), &NoteChanges::new())
            .await
            .unwrap();

        assert_eq!(result, Some(note));
    }

    #[tokio::test]
    async fn test_update_missing_note_is_none() {
        let (repo, user) = repo_with_user().await;

        let result = repo
            .update_note(
                NoteKey::new(user.id, Uuid::new_v4()),
                &NoteChanges::new().with_content("x"),
            )
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_returns_snapshot_once() {
        let (repo, user) = repo_with_user().await;
        let note = Note::new(user.id, "Doomed", "d");
        repo.create_note(&note).await.unwrap();

        assert_eq!(repo.delete_note(note.key()).await.unwrap(), Some(note.clone()));
        assert_eq!(repo.delete_note(note.key()).await.unwrap(), None);
        assert!(repo.list_notes(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_other_owner_keeps_note() {
        let (repo, user) = repo_with_user().await;
        let note = Note::new(user.id, "Mine", "m");
        repo.create_note(&note).await.unwrap();

        let deleted = repo
            .delete_note(NoteKey::new(Uuid::new_v4(), note.id))
            .await
            .unwrap();

        assert!(deleted.is_none());
        assert!(repo.get_note(note.key()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_file_database_persists_across_connections() {
        let path = std::env::temp_dir().join(format!("quicknotes-{}.db", Uuid::new_v4()));
        let path = path.to_string_lossy().to_string();

        let user = User::new("Persisted", "persisted@example.com", "hash");
        let note = Note::new(user.id, "Kept", "k");
        {
            let repo = SqliteRepository::new(&path).await.unwrap();
            repo.create_user(&user).await.unwrap();
            repo.create_note(&note).await.unwrap();
        }

        let reopened = SqliteRepository::new(&path).await.unwrap();
        assert_eq!(reopened.list_notes(user.id).await.unwrap(), vec![note]);

        let _ = std::fs::remove_file(&path);
    }
}
