use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current time at the precision every storage backend can round-trip.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Returns a timestamp strictly after `previous`, preferring `now`.
///
/// Two writes within the same microsecond would otherwise leave `updated_at`
/// unchanged.
pub fn advance_timestamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

/// A title + content record owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates a new note with a generated id and both timestamps set to now.
    pub fn new(user_id: Uuid, title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = timestamp_now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The compound key addressing this note through its owner.
    pub fn key(&self) -> NoteKey {
        NoteKey::new(self.user_id, self.id)
    }
}

/// Addresses a note through its owner.
///
/// Every single-note storage operation takes this instead of a bare note id,
/// so a lookup can never cross into another user's notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteKey {
    pub owner_id: Uuid,
    pub note_id: Uuid,
}

impl NoteKey {
    pub fn new(owner_id: Uuid, note_id: Uuid) -> Self {
        Self { owner_id, note_id }
    }

    /// True if `note` is the note this key addresses.
    pub fn matches(&self, note: &Note) -> bool {
        note.id == self.note_id && note.user_id == self.owner_id
    }
}

impl std::fmt::Display for NoteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner_id, self.note_id)
    }
}

/// A partial update: only the supplied fields are overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NoteChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }

    /// Applies the supplied fields and advances `updated_at`.
    ///
    /// An empty change set leaves the note untouched, timestamps included.
    pub fn apply_to(&self, note: &mut Note, now: DateTime<Utc>) {
        if self.is_empty() {
            return;
        }
        if let Some(title) = &self.title {
            note.title = title.clone();
        }
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
        note.updated_at = advance_timestamp(note.updated_at, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_note_has_matching_timestamps() {
        let note = Note::new(Uuid::new_v4(), "Test Note", "This is a test note.");
        assert_eq!(note.created_at, note.updated_at);
        assert_eq!(note.title, "Test Note");
        assert_eq!(note.content, "This is a test note.");
    }

    #[test]
    fn key_matches_only_owner_and_id() {
        let note = Note::new(Uuid::new_v4(), "a", "b");

        assert!(note.key().matches(&note));
        assert!(!NoteKey::new(Uuid::new_v4(), note.id).matches(&note));
        assert!(!NoteKey::new(note.user_id, Uuid::new_v4()).matches(&note));
    }

    #[test]
    fn apply_title_only_leaves_content() {
        let mut note = Note::new(Uuid::new_v4(), "Test Note", "Content");
        let before = note.updated_at;

        NoteChanges::new()
            .with_title("Updated")
            .apply_to(&mut note, timestamp_now());

        assert_eq!(note.title, "Updated");
        assert_eq!(note.content, "Content");
        assert!(note.updated_at > before);
    }

    #[test]
    fn apply_empty_changes_is_noop() {
        let mut note = Note::new(Uuid::new_v4(), "Test Note", "Content");
        let original = note.clone();

        NoteChanges::new().apply_to(&mut note, timestamp_now() + Duration::seconds(5));

        assert_eq!(note, original);
    }

    #[test]
    fn advance_timestamp_is_strict() {
        let t = timestamp_now();
        assert_eq!(advance_timestamp(t, t), t + Duration::microseconds(1));
        assert_eq!(
            advance_timestamp(t, t - Duration::seconds(1)),
            t + Duration::microseconds(1)
        );
        assert_eq!(
            advance_timestamp(t, t + Duration::seconds(1)),
            t + Duration::seconds(1)
        );
    }

    #[test]
    fn serializes_with_snake_case_fields() {
        let note = Note::new(Uuid::nil(), "t", "c");
        let json = serde_json::to_value(&note).unwrap();

        for field in ["id", "user_id", "title", "content", "created_at", "updated_at"] {
            assert!(json.get(field).is_some(), "missing {field}");
        }
    }
}
