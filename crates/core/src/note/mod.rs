mod requests;
mod types;

pub use requests::{CreateNoteRequest, TITLE_MAX_CHARS};
pub use types::{advance_timestamp, timestamp_now, Note, NoteChanges, NoteKey};
