//! Functional core for quicknotes.
//!
//! Pure types, validation and the storage/cache traits implemented by the
//! server crate. Nothing in here performs I/O.

pub mod auth;
pub mod cache;
pub mod note;
pub mod storage;
pub mod user;
pub mod validation;
