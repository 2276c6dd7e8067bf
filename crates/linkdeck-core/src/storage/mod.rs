//! Storage layer
//!
//! Persists the deck as a single JSON snapshot, written atomically. There is
//! no migration or versioning; a missing file falls back to the seed
//! bookmarks.

pub mod error;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::JsonPersistence;
