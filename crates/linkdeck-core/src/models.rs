//! Data models for linkdeck
//!
//! Defines the core data structures: Bookmark and Group. Groups hold an
//! ordered list of bookmarks; both serialize with the camelCase field names
//! used by the persisted JSON snapshot.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id of the group that always exists and cannot be deleted
pub const DEFAULT_GROUP_ID: &str = "default";

/// Icon reference used until a real favicon has been resolved
pub const PLACEHOLDER_ICON: &str = "placeholder.svg";

/// Current time as milliseconds since the epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// A saved bookmark
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    /// Unique identifier, stable for the lifetime of the bookmark
    pub id: String,
    /// Display title
    pub title: String,
    /// The URL (stored as given, not validated)
    pub url: String,
    /// Icon reference, `PLACEHOLDER_ICON` until resolved
    pub favicon: String,
    /// Id of the group this bookmark currently lives in
    pub group_id: String,
    /// Last edit time in epoch milliseconds, never moves backwards
    pub edited_time: i64,
}

impl Bookmark {
    /// Create a new bookmark with a generated id and the placeholder icon
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            url: url.into(),
            favicon: PLACEHOLDER_ICON.to_string(),
            group_id: String::new(),
            edited_time: now_millis(),
        }
    }

    /// Create a bookmark with a specific id (for seeds and storage)
    pub fn with_id(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            favicon: PLACEHOLDER_ICON.to_string(),
            group_id: String::new(),
            edited_time: now_millis(),
        }
    }

    /// Update the title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    /// Update the URL
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
        self.touch();
    }

    /// Update the icon reference without counting as an edit
    pub fn set_favicon(&mut self, favicon: impl Into<String>) {
        self.favicon = favicon.into();
    }

    /// Bump the edit time, clamped so it never decreases
    pub fn touch(&mut self) {
        self.edited_time = now_millis().max(self.edited_time);
    }
}

/// A named, ordered column of bookmarks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Group {
    /// Unique identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Bookmarks in display order
    pub bookmarks: Vec<Bookmark>,
}

impl Group {
    /// Create a new empty group with a generated id
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            bookmarks: Vec::new(),
        }
    }

    /// Create a group with a specific id (for seeds and storage)
    pub fn with_id(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            bookmarks: Vec::new(),
        }
    }

    /// Position of a bookmark within this group
    pub fn position_of(&self, bookmark_id: &str) -> Option<usize> {
        self.bookmarks.iter().position(|b| b.id == bookmark_id)
    }

    /// Whether this group holds the given bookmark
    pub fn contains(&self, bookmark_id: &str) -> bool {
        self.position_of(bookmark_id).is_some()
    }

    /// Whether this is the protected default group
    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_GROUP_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bookmark_new() {
        let bookmark = Bookmark::new("Example", "https://example.com");
        assert_eq!(bookmark.title, "Example");
        assert_eq!(bookmark.url, "https://example.com");
        assert_eq!(bookmark.favicon, PLACEHOLDER_ICON);
        assert!(bookmark.group_id.is_empty());
        assert!(!bookmark.id.is_empty());
    }

    #[test]
    fn test_bookmark_ids_unique() {
        let a = Bookmark::new("A", "https://a.example");
        let b = Bookmark::new("B", "https://b.example");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_bookmark_with_id() {
        let bookmark = Bookmark::with_id("default-3", "Wikipedia", "https://wikipedia.org");
        assert_eq!(bookmark.id, "default-3");
        assert_eq!(bookmark.title, "Wikipedia");
    }

    #[test]
    fn test_bookmark_set_title_bumps_edited_time() {
        let mut bookmark = Bookmark::new("Example", "https://example.com");
        let original = bookmark.edited_time;
        std::thread::sleep(std::time::Duration::from_millis(10));
        bookmark.set_title("Example Site");
        assert_eq!(bookmark.title, "Example Site");
        assert!(bookmark.edited_time > original);
    }

    #[test]
    fn test_bookmark_touch_never_decreases() {
        let mut bookmark = Bookmark::new("Example", "https://example.com");
        bookmark.edited_time = i64::MAX - 1;
        bookmark.touch();
        assert_eq!(bookmark.edited_time, i64::MAX - 1);
    }

    #[test]
    fn test_bookmark_set_favicon_keeps_edited_time() {
        let mut bookmark = Bookmark::with_id("b1", "Example", "https://example.com");
        bookmark.edited_time = 1;
        bookmark.set_favicon("https://example.com/favicon.ico");
        assert_eq!(bookmark.favicon, "https://example.com/favicon.ico");
        assert_eq!(bookmark.edited_time, 1);
    }

    #[test]
    fn test_bookmark_serialization_wire_names() {
        let mut bookmark = Bookmark::with_id("b1", "Example", "https://example.com");
        bookmark.group_id = "default".to_string();
        bookmark.edited_time = 1;
        let json = serde_json::to_string(&bookmark).unwrap();
        assert!(json.contains("\"groupId\":\"default\""));
        assert!(json.contains("\"editedTime\":1"));

        let deserialized: Bookmark = serde_json::from_str(&json).unwrap();
        assert_eq!(bookmark, deserialized);
    }

    #[test]
    fn test_group_new() {
        let group = Group::new("Work");
        assert_eq!(group.title, "Work");
        assert!(group.bookmarks.is_empty());
        assert!(!group.is_default());
    }

    #[test]
    fn test_group_with_id_default() {
        let group = Group::with_id(DEFAULT_GROUP_ID, "Default");
        assert!(group.is_default());
    }

    #[test]
    fn test_group_position_of() {
        let mut group = Group::with_id("g1", "Work");
        group
            .bookmarks
            .push(Bookmark::with_id("b1", "A", "https://a.example"));
        group
            .bookmarks
            .push(Bookmark::with_id("b2", "B", "https://b.example"));
        assert_eq!(group.position_of("b2"), Some(1));
        assert_eq!(group.position_of("missing"), None);
        assert!(group.contains("b1"));
        assert!(!group.contains("missing"));
    }

    #[test]
    fn test_group_serialization() {
        let mut group = Group::with_id("g1", "Work");
        group
            .bookmarks
            .push(Bookmark::with_id("b1", "A", "https://a.example"));
        let json = serde_json::to_string(&group).unwrap();
        let deserialized: Group = serde_json::from_str(&json).unwrap();
        assert_eq!(group, deserialized);
    }
}
