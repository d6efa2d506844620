//! Request payloads for note operations.
//!
//! Bodies are validated from raw JSON so that each offending field gets its
//! own message.

use serde_json::Value;
use uuid::Uuid;

use crate::validation::{body_object, check_max_chars, read_string, Presence, ValidationErrors};

use super::types::{Note, NoteChanges};

/// Maximum note title length, in characters.
pub const TITLE_MAX_CHARS: usize = 255;

/// Validated payload for creating a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
}

impl CreateNoteRequest {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Validates a create body: `title` required string ≤255 chars,
    /// `content` required string.
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let body = body_object(body);
        let mut errors = ValidationErrors::new();

        let title = read_string(&body, "title", Presence::Required, &mut errors);
        if let Some(title) = &title {
            check_max_chars("title", title, TITLE_MAX_CHARS, &mut errors);
        }
        let content = read_string(&body, "content", Presence::Required, &mut errors);

        match (title, content) {
            (Some(title), Some(content)) if errors.is_empty() => Ok(Self { title, content }),
            _ => Err(errors),
        }
    }

    /// Builds the note owned by `owner_id`.
    pub fn into_note(self, owner_id: Uuid) -> Note {
        Note::new(owner_id, self.title, self.content)
    }
}

impl NoteChanges {
    /// Validates an update body: `title` optional string ≤255 chars,
    /// `content` optional string. Unknown fields are ignored.
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let body = body_object(body);
        let mut errors = ValidationErrors::new();

        let title = read_string(&body, "title", Presence::Sometimes, &mut errors);
        if let Some(title) = &title {
            check_max_chars("title", title, TITLE_MAX_CHARS, &mut errors);
        }
        let content = read_string(&body, "content", Presence::Sometimes, &mut errors);

        errors.into_result(Self { title, content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_accepts_valid_body() {
        let request = CreateNoteRequest::from_json(&json!({
            "title": "Test Note",
            "content": "This is a test note."
        }))
        .unwrap();

        assert_eq!(
            request,
            CreateNoteRequest::new("Test Note", "This is a test note.")
        );
    }

    #[test]
    fn create_reports_every_missing_field() {
        let errors = CreateNoteRequest::from_json(&json!({})).unwrap_err();

        assert_eq!(errors.get("title"), ["The title field is required."]);
        assert_eq!(errors.get("content"), ["The content field is required."]);
    }

    #[test]
    fn create_rejects_long_title() {
        let errors = CreateNoteRequest::from_json(&json!({
            "title": "x".repeat(256),
            "content": "body"
        }))
        .unwrap_err();

        assert_eq!(
            errors.get("title"),
            ["The title field must not be greater than 255 characters."]
        );
        assert!(errors.get("content").is_empty());
    }

    #[test]
    fn create_rejects_wrong_types() {
        let errors = CreateNoteRequest::from_json(&json!({
            "title": ["a"],
            "content": true
        }))
        .unwrap_err();

        assert_eq!(errors.get("title"), ["The title field must be a string."]);
        assert_eq!(errors.get("content"), ["The content field must be a string."]);
    }

    #[test]
    fn create_with_non_object_body_requires_fields() {
        let errors = CreateNoteRequest::from_json(&json!("hello")).unwrap_err();
        assert_eq!(errors.fields().len(), 2);
    }

    #[test]
    fn into_note_sets_owner() {
        let owner = Uuid::new_v4();
        let note = CreateNoteRequest::new("t", "c").into_note(owner);

        assert_eq!(note.user_id, owner);
        assert_eq!(note.title, "t");
        assert_eq!(note.content, "c");
    }

    #[test]
    fn changes_accept_partial_body() {
        let changes = NoteChanges::from_json(&json!({"title": "Updated"})).unwrap();
        assert_eq!(changes, NoteChanges::new().with_title("Updated"));

        let changes = NoteChanges::from_json(&json!({})).unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn changes_reject_invalid_fields() {
        let errors = NoteChanges::from_json(&json!({
            "title": "y".repeat(300),
            "content": 1
        }))
        .unwrap_err();

        assert_eq!(errors.get("title").len(), 1);
        assert_eq!(errors.get("content"), ["The content field must be a string."]);
    }

    #[test]
    fn changes_ignore_unknown_fields() {
        let changes =
            NoteChanges::from_json(&json!({"content": "new", "user_id": "someone"})).unwrap();
        assert_eq!(changes, NoteChanges::new().with_content("new"));
    }
}
