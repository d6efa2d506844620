//! In-memory storage backend.
//!
//! Stores everything behind `Arc<RwLock<_>>`. Data is lost when the process
//! exits, which makes it the default for development and tests.

mod repository;

pub use repository::InMemoryRepository;
