//! Unified storage interface
//!
//! The `Store` owns the in-memory deck and coordinates persistence: every
//! state-changing operation writes a fresh snapshot after mutating. When a
//! save fails the mutation has still been applied in memory; the error
//! surfaces so the caller can warn, and the session keeps working off the
//! in-memory state.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;  // Loads existing snapshot or seeds
//!
//! // Add a bookmark
//! let bookmark = Bookmark::new("Example", "https://example.com");
//! store.add_bookmark(bookmark, "default")?;
//!
//! // Read state
//! for group in store.groups() {
//!     println!("{}: {} bookmarks", group.title, group.bookmarks.len());
//! }
//! ```

use anyhow::{Context, Result};
use tracing::warn;

use crate::config::Config;
use crate::deck::Deck;
use crate::models::{Bookmark, Group};
use crate::storage::JsonPersistence;

/// Unified storage interface for linkdeck
///
/// Owns the deck and keeps the JSON snapshot on disk in step with it.
pub struct Store {
    /// The in-memory deck (source of truth)
    deck: Deck,
    /// Snapshot persistence handler
    persistence: JsonPersistence,
    /// Configuration
    config: Config,
}

impl Store {
    /// Open the store, seeding a snapshot if none exists
    ///
    /// On first run the bundled seed bookmarks are written to disk. On
    /// subsequent runs the existing snapshot is loaded as-is.
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the store with a specific configuration
    pub fn open_with_config(config: Config) -> Result<Self> {
        let persistence = JsonPersistence::new(config.clone());

        let groups = persistence
            .load_or_seed()
            .context("Failed to load bookmarks snapshot")?;

        let mut store = Self {
            deck: Deck::from_groups(groups),
            persistence,
            config,
        };

        // A hand-edited snapshot may have lost the default group
        if store.deck.ensure_default_group() {
            warn!("Snapshot was missing the default group, restored it");
            store.save()?;
        }

        Ok(store)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read access to the deck
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// The groups in display order
    pub fn groups(&self) -> &[Group] {
        self.deck.groups()
    }

    // ==================== Group Operations ====================

    /// Add a new empty group, returning its id
    pub fn add_group(&mut self, title: impl Into<String>) -> Result<String> {
        let id = self.deck.add_group(title);
        self.save()?;
        Ok(id)
    }

    /// Rename a group
    pub fn edit_group_title(&mut self, group_id: &str, title: impl Into<String>) -> Result<()> {
        self.deck.edit_group_title(group_id, title)?;
        self.save()
    }

    /// Delete a group and all its bookmarks
    ///
    /// The default group is protected; deleting an unknown id is a no-op.
    pub fn delete_group(&mut self, group_id: &str) -> Result<bool> {
        let changed = self.deck.delete_group(group_id)?;
        if changed {
            self.save()?;
        }
        Ok(changed)
    }

    /// Move a group to a new position in the column order
    pub fn reorder_groups(&mut self, from: usize, to: usize) -> Result<bool> {
        let changed = self.deck.reorder_groups(from, to);
        if changed {
            self.save()?;
        }
        Ok(changed)
    }

    // ==================== Bookmark Operations ====================

    /// Add a bookmark to the end of a group, returning the id stored
    pub fn add_bookmark(&mut self, bookmark: Bookmark, group_id: &str) -> Result<String> {
        let id = self.deck.add_bookmark(bookmark, group_id)?;
        self.save()?;
        Ok(id)
    }

    /// Replace a bookmark with an edited version
    pub fn edit_bookmark(&mut self, bookmark: Bookmark, group_id: &str) -> Result<bool> {
        let changed = self.deck.edit_bookmark(bookmark, group_id)?;
        if changed {
            self.save()?;
        }
        Ok(changed)
    }

    /// Remove a bookmark from a group (no-op when either is missing)
    pub fn delete_bookmark(&mut self, bookmark_id: &str, group_id: &str) -> Result<bool> {
        let changed = self.deck.delete_bookmark(bookmark_id, group_id);
        if changed {
            self.save()?;
        }
        Ok(changed)
    }

    /// Move a bookmark to a new position within its group
    pub fn reorder_within_group(&mut self, group_id: &str, from: usize, to: usize) -> Result<bool> {
        let changed = self.deck.reorder_within_group(group_id, from, to)?;
        if changed {
            self.save()?;
        }
        Ok(changed)
    }

    /// Move a bookmark from one group into another
    pub fn move_bookmark_between_groups(
        &mut self,
        bookmark_id: &str,
        from_group_id: &str,
        to_group_id: &str,
        to_index: Option<usize>,
    ) -> Result<bool> {
        let changed =
            self.deck
                .move_bookmark_between_groups(bookmark_id, from_group_id, to_group_id, to_index)?;
        if changed {
            self.save()?;
        }
        Ok(changed)
    }

    /// Record a resolved favicon for a bookmark
    ///
    /// Returns `Ok(false)` and saves nothing when the bookmark no longer
    /// exists, so late resolutions for deleted bookmarks are dropped.
    pub fn set_bookmark_favicon(
        &mut self,
        bookmark_id: &str,
        favicon: impl Into<String>,
    ) -> Result<bool> {
        let applied = self.deck.set_bookmark_favicon(bookmark_id, favicon);
        if applied {
            self.save()?;
        } else {
            warn!("Dropped favicon for missing bookmark {}", bookmark_id);
        }
        Ok(applied)
    }

    // ==================== Bulk State ====================

    /// Replace the whole deck with a previously captured arrangement
    ///
    /// Used to roll back an aborted drag.
    pub fn restore_groups(&mut self, groups: Vec<Group>) -> Result<()> {
        self.deck = Deck::from_groups(groups);
        self.save()
    }

    /// Save the current deck to disk
    ///
    /// Called automatically after every state-changing operation.
    pub fn save(&mut self) -> Result<()> {
        self.persistence
            .save(self.deck.groups())
            .context("Failed to save bookmarks snapshot")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::DeckError;
    use crate::models::DEFAULT_GROUP_ID;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            fetch_favicons: false,
            log_file: None,
        }
    }

    #[test]
    fn test_open_seeds_new_store() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let store = Store::open_with_config(config.clone()).unwrap();

        assert_eq!(store.deck().group_count(), 2);
        assert_eq!(store.deck().bookmark_count(), 16);
        assert!(config.bookmarks_path().exists());
    }

    #[test]
    fn test_open_loads_existing_store() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        {
            let mut store = Store::open_with_config(config.clone()).unwrap();
            store
                .add_bookmark(
                    Bookmark::new("Rust", "https://rust-lang.org"),
                    DEFAULT_GROUP_ID,
                )
                .unwrap();
        }

        // Reopen - should load existing data, not re-seed
        let store = Store::open_with_config(config).unwrap();
        assert_eq!(
            store.deck().group(DEFAULT_GROUP_ID).unwrap().bookmarks.len(),
            10
        );
    }

    #[test]
    fn test_open_restores_missing_default_group() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let persistence = JsonPersistence::new(config.clone());
        persistence
            .save(&[Group::with_id("work", "Work")])
            .unwrap();

        let store = Store::open_with_config(config).unwrap();
        assert_eq!(store.groups()[0].id, DEFAULT_GROUP_ID);
        assert_eq!(store.groups()[1].id, "work");
    }

    #[test]
    fn test_add_bookmark_to_seeded_default() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        let id = store
            .add_bookmark(
                Bookmark::new("Test", "https://test.com"),
                DEFAULT_GROUP_ID,
            )
            .unwrap();

        let group = store.deck().group(DEFAULT_GROUP_ID).unwrap();
        assert_eq!(group.bookmarks.len(), 10);
        let last = group.bookmarks.last().unwrap();
        assert_eq!(last.id, id);
        assert_eq!(last.title, "Test");
        assert_eq!(last.url, "https://test.com");
        assert_eq!(last.group_id, DEFAULT_GROUP_ID);
        assert!(store.deck().bookmarks().all(|b| !b.id.is_empty()));
    }

    #[test]
    fn test_add_group_persists() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let id;
        {
            let mut store = Store::open_with_config(config.clone()).unwrap();
            id = store.add_group("Reading").unwrap();
        }

        let store = Store::open_with_config(config).unwrap();
        assert_eq!(store.deck().group(&id).unwrap().title, "Reading");
    }

    #[test]
    fn test_delete_default_group_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let mut store = Store::open_with_config(config.clone()).unwrap();

        let err = store.delete_group(DEFAULT_GROUP_ID).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DeckError>(),
            Some(&DeckError::DefaultGroupProtected)
        );

        // Nothing changed, in memory or on disk
        assert_eq!(store.deck().group_count(), 2);
        let reopened = Store::open_with_config(config).unwrap();
        assert_eq!(reopened.deck().group_count(), 2);
    }

    #[test]
    fn test_delete_group_removes_bookmarks() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        assert!(store.delete_group("kaosc-groupId").unwrap());
        assert_eq!(store.deck().group_count(), 1);
        assert!(store.deck().find_bookmark("kaosc-1").is_none());
    }

    #[test]
    fn test_missing_group_errors_are_typed() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        let err = store
            .add_bookmark(Bookmark::new("X", "https://x.example"), "missing")
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<DeckError>(),
            Some(&DeckError::GroupNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_delete_missing_bookmark_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        assert!(!store.delete_bookmark("ghost", DEFAULT_GROUP_ID).unwrap());
        assert_eq!(store.deck().bookmark_count(), 16);
    }

    #[test]
    fn test_reorder_groups_from_seed() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let mut store = Store::open_with_config(config.clone()).unwrap();

        assert!(store.reorder_groups(1, 0).unwrap());
        assert_eq!(store.groups()[0].id, "kaosc-groupId");
        assert_eq!(store.groups()[1].id, DEFAULT_GROUP_ID);

        let reopened = Store::open_with_config(config).unwrap();
        assert_eq!(reopened.groups()[0].id, "kaosc-groupId");
    }

    #[test]
    fn test_reorder_within_group_persists() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        {
            let mut store = Store::open_with_config(config.clone()).unwrap();
            assert!(store
                .reorder_within_group(DEFAULT_GROUP_ID, 0, 2)
                .unwrap());
        }

        let store = Store::open_with_config(config).unwrap();
        let group = store.deck().group(DEFAULT_GROUP_ID).unwrap();
        assert_eq!(group.bookmarks[2].id, "default-0");
    }

    #[test]
    fn test_move_bookmark_between_groups() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        assert!(store
            .move_bookmark_between_groups("default-3", DEFAULT_GROUP_ID, "kaosc-groupId", Some(0))
            .unwrap());

        assert!(!store.deck().group(DEFAULT_GROUP_ID).unwrap().contains("default-3"));
        let target = store.deck().group("kaosc-groupId").unwrap();
        assert_eq!(target.bookmarks[0].id, "default-3");
        assert_eq!(target.bookmarks[0].group_id, "kaosc-groupId");
    }

    #[test]
    fn test_edit_bookmark_persists() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        {
            let mut store = Store::open_with_config(config.clone()).unwrap();
            let mut edited = store.deck().get_bookmark("default-3").unwrap().clone();
            edited.set_title("Wiki");
            assert!(store.edit_bookmark(edited, DEFAULT_GROUP_ID).unwrap());
        }

        let store = Store::open_with_config(config).unwrap();
        let bookmark = store.deck().get_bookmark("default-3").unwrap();
        assert_eq!(bookmark.title, "Wiki");
        // Position preserved
        let group = store.deck().group(DEFAULT_GROUP_ID).unwrap();
        assert_eq!(group.position_of("default-3"), Some(3));
    }

    #[test]
    fn test_set_bookmark_favicon() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let mut store = Store::open_with_config(config.clone()).unwrap();

        assert!(store
            .set_bookmark_favicon("default-3", "https://wikipedia.org/static/favicon.ico")
            .unwrap());

        let reopened = Store::open_with_config(config).unwrap();
        assert_eq!(
            reopened.deck().get_bookmark("default-3").unwrap().favicon,
            "https://wikipedia.org/static/favicon.ico"
        );
    }

    #[test]
    fn test_set_bookmark_favicon_stale_is_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_with_config(test_config(&temp_dir)).unwrap();

        store.delete_bookmark("default-3", DEFAULT_GROUP_ID).unwrap();
        assert!(!store
            .set_bookmark_favicon("default-3", "https://wikipedia.org/favicon.ico")
            .unwrap());
    }

    #[test]
    fn test_restore_groups() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let mut store = Store::open_with_config(config.clone()).unwrap();

        let snapshot = store.groups().to_vec();
        store
            .move_bookmark_between_groups("default-3", DEFAULT_GROUP_ID, "kaosc-groupId", None)
            .unwrap();
        assert_ne!(store.groups(), snapshot.as_slice());

        store.restore_groups(snapshot.clone()).unwrap();
        assert_eq!(store.groups(), snapshot.as_slice());

        let reopened = Store::open_with_config(config).unwrap();
        assert_eq!(reopened.groups(), snapshot.as_slice());
    }

    #[test]
    fn test_data_persists_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        {
            let mut store = Store::open_with_config(config.clone()).unwrap();
            let group_id = store.add_group("Reading").unwrap();
            store
                .add_bookmark(Bookmark::new("Blog", "https://blog.example"), &group_id)
                .unwrap();
        }

        {
            let store = Store::open_with_config(config).unwrap();
            assert_eq!(store.deck().group_count(), 3);
            let bookmark = store
                .deck()
                .bookmarks()
                .find(|b| b.title == "Blog")
                .unwrap();
            assert_eq!(bookmark.url, "https://blog.example");
        }
    }
}
