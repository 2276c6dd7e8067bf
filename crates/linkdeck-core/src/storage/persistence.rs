//! Bookmarks snapshot persistence
//!
//! Handles saving and loading the bookmark groups to/from the filesystem as
//! a single JSON document (an array of groups, camelCase field names).
//! Uses atomic writes (write to temp file, then rename) to prevent
//! corruption.
//!
//! Storage location: `~/.local/share/linkdeck/bookmarks.json`
//! (configurable via `Config`)

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::config::Config;
use crate::models::Group;
use crate::seed::seed_groups;
use crate::storage::error::{StorageError, StorageResult};

/// Persistence layer for the bookmarks snapshot
///
/// Provides atomic file operations for saving/loading the groups.
pub struct JsonPersistence {
    config: Config,
}

impl JsonPersistence {
    /// Create a new persistence handler with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Check if a snapshot exists on disk
    pub fn exists(&self) -> bool {
        self.config.bookmarks_path().exists()
    }

    /// Save the groups to disk using atomic write
    ///
    /// This writes to a temporary file first, then renames it to the target
    /// path, so the snapshot is never left in a partially-written state.
    pub fn save(&self, groups: &[Group]) -> StorageResult<()> {
        let path = self.config.bookmarks_path();

        let data = serde_json::to_vec_pretty(groups).map_err(|e| StorageError::InvalidSnapshot {
            path: path.clone(),
            details: e.to_string(),
        })?;

        atomic_write(&path, &data)?;
        debug!("Saved {} groups to {:?}", groups.len(), path);
        Ok(())
    }

    /// Load the groups from disk
    ///
    /// Returns `None` if the snapshot file doesn't exist.
    /// Returns an error if the file exists but can't be read or parsed.
    pub fn load(&self) -> StorageResult<Option<Vec<Group>>> {
        let path = self.config.bookmarks_path();

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| StorageError::Read {
            path: path.clone(),
            source: e,
        })?;

        let groups: Vec<Group> =
            serde_json::from_str(&content).map_err(|e| StorageError::InvalidSnapshot {
                path: path.clone(),
                details: e.to_string(),
            })?;

        debug!("Loaded {} groups from {:?}", groups.len(), path);
        Ok(Some(groups))
    }

    /// Load the existing snapshot or fall back to the seed bookmarks
    ///
    /// On first run the seed groups are written to disk and returned, so the
    /// next load sees a real snapshot.
    pub fn load_or_seed(&self) -> StorageResult<Vec<Group>> {
        if let Some(groups) = self.load()? {
            return Ok(groups);
        }

        let groups = seed_groups();
        self.save(&groups)?;
        debug!("No snapshot found, wrote seed bookmarks");
        Ok(groups)
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
///
/// This ensures the target file is never left in a partially-written state.
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    // Temp file lives in the same directory so the rename stays atomic
    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    // Sync to disk before rename
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|e| StorageError::ReplaceFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bookmark, DEFAULT_GROUP_ID};
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            fetch_favicons: false,
            log_file: None,
        }
    }

    fn sample_groups() -> Vec<Group> {
        let mut group = Group::with_id(DEFAULT_GROUP_ID, "Default");
        let mut bookmark = Bookmark::with_id("b1", "Example", "https://example.com");
        bookmark.group_id = DEFAULT_GROUP_ID.to_string();
        bookmark.edited_time = 1;
        group.bookmarks.push(bookmark);
        vec![group]
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = JsonPersistence::new(test_config(&temp_dir));

        // Initially no snapshot
        assert!(!persistence.exists());
        assert!(persistence.load().unwrap().is_none());

        persistence.save(&sample_groups()).unwrap();
        assert!(persistence.exists());

        let loaded = persistence.load().unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, DEFAULT_GROUP_ID);
        assert_eq!(loaded[0].bookmarks[0].url, "https://example.com");
    }

    #[test]
    fn test_snapshot_wire_format() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let persistence = JsonPersistence::new(config.clone());

        persistence.save(&sample_groups()).unwrap();

        let raw = fs::read_to_string(config.bookmarks_path()).unwrap();
        assert!(raw.trim_start().starts_with('['));
        assert!(raw.contains("\"groupId\""));
        assert!(raw.contains("\"editedTime\""));
        assert!(!raw.contains("\"group_id\""));
    }

    #[test]
    fn test_load_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = JsonPersistence::new(test_config(&temp_dir));

        let groups = crate::seed::seed_groups();
        persistence.save(&groups).unwrap();

        let loaded = persistence.load().unwrap().unwrap();
        assert_eq!(loaded, groups);
    }

    #[test]
    fn test_load_or_seed_new() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = JsonPersistence::new(test_config(&temp_dir));

        let groups = persistence.load_or_seed().unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].id, DEFAULT_GROUP_ID);

        // Seed should have been written to disk
        assert!(persistence.exists());
        let reloaded = persistence.load().unwrap().unwrap();
        assert_eq!(reloaded, groups);
    }

    #[test]
    fn test_load_or_seed_existing() {
        let temp_dir = TempDir::new().unwrap();
        let persistence = JsonPersistence::new(test_config(&temp_dir));

        persistence.save(&sample_groups()).unwrap();

        // Existing snapshot wins over the seed
        let groups = persistence.load_or_seed().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].bookmarks[0].id, "b1");
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let persistence = JsonPersistence::new(config.clone());

        fs::write(config.bookmarks_path(), "not json").unwrap();

        let err = persistence.load().unwrap_err();
        assert!(matches!(err, StorageError::InvalidSnapshot { .. }));
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir
            .path()
            .join("a")
            .join("b")
            .join("c")
            .join("file.txt");

        atomic_write(&nested_path, b"test data").unwrap();

        assert!(nested_path.exists());
        let content = fs::read_to_string(&nested_path).unwrap();
        assert_eq!(content, "test data");
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bookmarks.json");

        atomic_write(&path, b"[]").unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }
}
