//! SQLite schema definitions and SQL query constants.

/// SQL statement to create all tables.
///
/// Foreign keys are off by default in SQLite; the pragma is per connection
/// and must run before any delete relies on the cascade.
pub const CREATE_TABLES: &str = r#"
PRAGMA foreign_keys = ON;

-- Users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Notes table; rowid keeps insertion order
CREATE TABLE IF NOT EXISTS notes (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_notes_user_id ON notes(user_id);
"#;

// User queries
pub const INSERT_USER: &str = r#"
INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_USER_BY_ID: &str = r#"
SELECT id, name, email, password_hash, created_at, updated_at
FROM users
WHERE id = ?1
"#;

pub const SELECT_USER_BY_EMAIL: &str = r#"
SELECT id, name, email, password_hash, created_at, updated_at
FROM users
WHERE email = ?1
"#;

// Note queries. Every single-note query filters on owner and id together.
pub const INSERT_NOTE: &str = r#"
INSERT INTO notes (id, user_id, title, content, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_NOTES_BY_USER: &str = r#"
SELECT id, user_id, title, content, created_at, updated_at
FROM notes
WHERE user_id = ?1
ORDER BY rowid ASC
"#;

pub const SELECT_NOTE: &str = r#"
SELECT id, user_id, title, content, created_at, updated_at
FROM notes
WHERE user_id = ?1 AND id = ?2
"#;

pub const UPDATE_NOTE: &str = r#"
UPDATE notes
SET title = ?3, content = ?4, updated_at = ?5
WHERE user_id = ?1 AND id = ?2
"#;

pub const DELETE_NOTE: &str = r#"
DELETE FROM notes
WHERE user_id = ?1 AND id = ?2
"#;
