//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use chrono::{DateTime, Utc};
use quicknotes_core::note::Note;
use quicknotes_core::user::User;
use rusqlite::Row;
use uuid::Uuid;

/// Convert a SQLite row to a Note.
///
/// Expected columns: id, user_id, title, content, created_at, updated_at
pub fn row_to_note(row: &Row) -> rusqlite::Result<Note> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;

    Ok(Note {
        id: parse_uuid(0, &id)?,
        user_id: parse_uuid(1, &user_id)?,
        title: row.get(2)?,
        content: row.get(3)?,
        created_at: parse_datetime(4, &created_at)?,
        updated_at: parse_datetime(5, &updated_at)?,
    })
}

/// Convert a SQLite row to a User.
///
/// Expected columns: id, name, email, password_hash, created_at, updated_at
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let id: String = row.get(0)?;
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;

    Ok(User {
        id: parse_uuid(0, &id)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        created_at: parse_datetime(4, &created_at)?,
        updated_at: parse_datetime(5, &updated_at)?,
    })
}

/// Format a DateTime for SQLite storage (RFC 3339).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_uuid(column: usize, s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_datetime(column: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quicknotes_core::note::timestamp_now;

    #[test]
    fn test_datetime_round_trips_with_microseconds() {
        let now = timestamp_now();
        let parsed = parse_datetime(0, &format_datetime(&now)).unwrap();
        assert_eq!(parsed, now);
    }

    #[test]
    fn test_invalid_uuid_reports_column() {
        let err = parse_uuid(1, "not-a-uuid").unwrap_err();
        assert!(matches!(
            err,
            rusqlite::Error::FromSqlConversionFailure(1, _, _)
        ));
    }

    #[test]
    fn test_invalid_datetime_is_rejected() {
        assert!(parse_datetime(4, "yesterday").is_err());
    }

    #[test]
    fn test_row_to_note_reads_all_columns() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let note = Note::new(Uuid::new_v4(), "Title", "Content");

        let read = conn
            .query_row(
                "SELECT ?1, ?2, ?3, ?4, ?5, ?6",
                rusqlite::params![
                    note.id.to_string(),
                    note.user_id.to_string(),
                    note.title,
                    note.content,
                    format_datetime(&note.created_at),
                    format_datetime(&note.updated_at)
                ],
                row_to_note,
            )
            .unwrap();

        assert_eq!(read, note);
    }
}
