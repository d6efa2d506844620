//! Note CRUD handlers.
//!
//! Every handler is scoped to the authenticated user. Lists are read through
//! the note list cache, and each mutation drops the owner's snapshot before
//! the audit line is written.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};
use uuid::Uuid;

use quicknotes_auth::CurrentUser;
use quicknotes_core::note::{CreateNoteRequest, Note, NoteChanges, NoteKey};

use crate::{handlers::AppError, state::AppState};

/// JSON request body; syntax and content-type failures become [`AppError::Body`].
type JsonBody = WithRejection<Json<Value>, AppError>;

/// Resolves a path segment to a key owned by `owner_id`.
///
/// Ids that are not UUIDs cannot name any note, so they read as missing.
fn note_key(owner_id: Uuid, id: &str) -> Result<NoteKey, AppError> {
    let note_id = Uuid::parse_str(id).map_err(|_| AppError::NotFound)?;
    Ok(NoteKey::new(owner_id, note_id))
}

/// List the caller's notes (GET /api/notes).
pub async fn list_notes(
    State(state): State<AppState>,
    CurrentUser { user, .. }: CurrentUser,
) -> Result<Json<Vec<Note>>, AppError> {
    let notes = state
        .note_cache
        .get_or_load(user.id, || state.notes.list_notes(user.id))
        .await?;

    Ok(Json(notes))
}

/// Get one of the caller's notes (GET /api/notes/{id}).
pub async fn get_note(
    State(state): State<AppState>,
    CurrentUser { user, .. }: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Note>, AppError> {
    let key = note_key(user.id, &id)?;

    let note = state.notes.get_note(key).await?.ok_or(AppError::NotFound)?;

    Ok(Json(note))
}

/// Create a note owned by the caller (POST /api/notes).
pub async fn create_note(
    State(state): State<AppState>,
    CurrentUser { user, .. }: CurrentUser,
    WithRejection(Json(body), _): JsonBody,
) -> Result<(StatusCode, Json<Note>), AppError> {
    let request = CreateNoteRequest::from_json(&body)?;
    let note = request.into_note(user.id);

    state.notes.create_note(&note).await?;
    state.note_cache.invalidate(user.id).await?;

    tracing::info!(target: "audit", user_id = %user.id, note_id = %note.id, "Note created");
    Ok((StatusCode::CREATED, Json(note)))
}

/// Partially update one of the caller's notes (PUT /api/notes/{id}).
pub async fn update_note(
    State(state): State<AppState>,
    CurrentUser { user, .. }: CurrentUser,
    Path(id): Path<String>,
    WithRejection(Json(body), _): JsonBody,
) -> Result<Json<Note>, AppError> {
    let changes = NoteChanges::from_json(&body)?;
    let key = note_key(user.id, &id)?;

    let note = state
        .notes
        .update_note(key, &changes)
        .await?
        .ok_or(AppError::NotFound)?;

    state.note_cache.invalidate(user.id).await?;

    tracing::info!(target: "audit", user_id = %user.id, note_id = %note.id, "Note updated");
    Ok(Json(note))
}

/// Delete one of the caller's notes (DELETE /api/notes/{id}).
pub async fn delete_note(
    State(state): State<AppState>,
    CurrentUser { user, .. }: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let key = note_key(user.id, &id)?;

    let note = state
        .notes
        .delete_note(key)
        .await?
        .ok_or(AppError::NotFound)?;

    state.note_cache.invalidate(user.id).await?;

    tracing::info!(target: "audit", user_id = %user.id, note_id = %note.id, "Note deleted");
    Ok(Json(json!({ "message": "Note deleted" })))
}
