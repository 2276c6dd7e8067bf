//! linkdeck Core Library
//!
//! This crate provides the core functionality for linkdeck, a local-first
//! bookmark deck: URLs organized into named, ordered groups, reorderable by
//! drag and drop, persisted as a single JSON snapshot.
//!
//! # Architecture
//!
//! The in-memory deck is the source of truth. Every state-changing operation
//! goes through the [`Store`], which saves a fresh snapshot after mutating.
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open()?;
//!
//! // Add a bookmark
//! let bookmark = Bookmark::new("Example", "https://example.com");
//! store.add_bookmark(bookmark, DEFAULT_GROUP_ID)?;
//!
//! // Drag it into another group
//! let mut drag = DragEngine::new();
//! drag.start(&store, &id);
//! drag.over(&mut store, "some-group", false)?;
//! drag.end(&mut store, &target_id)?;
//! ```
//!
//! # Modules
//!
//! - `store`: Unified storage interface (main entry point)
//! - `models`: Data structures for bookmarks and groups
//! - `deck`: The bookmark collection and its state transitions
//! - `drag`: Drag-reorder engine
//! - `seed`: First-run bookmarks
//! - `storage`: JSON snapshot persistence
//! - `config`: Application configuration

pub mod config;
pub mod deck;
pub mod drag;
pub mod models;
pub mod seed;
pub mod storage;
pub mod store;

pub use config::Config;
pub use deck::{Deck, DeckError};
pub use drag::{DragEngine, DragSession};
pub use models::{Bookmark, Group, DEFAULT_GROUP_ID, PLACEHOLDER_ICON};
pub use storage::{JsonPersistence, StorageError, StorageResult};
pub use store::Store;
