//! Bookmark deck document
//!
//! The deck is the single source of truth: an ordered list of groups, each
//! holding an ordered list of bookmarks. Every state transition lives here as
//! a method. Mutating methods report whether anything changed so the store
//! can skip redundant saves; the store wraps them with persistence.

use thiserror::Error;
use uuid::Uuid;

use crate::models::{Bookmark, Group, DEFAULT_GROUP_ID};

/// Errors that can occur during deck operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeckError {
    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Bookmark not found: {0}")]
    BookmarkNotFound(String),

    #[error("The default group cannot be deleted")]
    DefaultGroupProtected,
}

/// The full bookmark collection, in display order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deck {
    groups: Vec<Group>,
}

impl Deck {
    /// Create a deck holding only an empty default group
    pub fn new() -> Self {
        Self {
            groups: vec![Group::with_id(DEFAULT_GROUP_ID, "Default")],
        }
    }

    /// Build a deck from loaded groups
    pub fn from_groups(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    /// The groups in display order
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Insert an empty default group if the snapshot lost it
    ///
    /// Returns true when the deck had to be repaired.
    pub fn ensure_default_group(&mut self) -> bool {
        if self.groups.iter().any(|g| g.is_default()) {
            return false;
        }
        self.groups
            .insert(0, Group::with_id(DEFAULT_GROUP_ID, "Default"));
        true
    }

    // ==================== Group Operations ====================

    /// Append a new empty group, returning its id
    pub fn add_group(&mut self, title: impl Into<String>) -> String {
        let group = Group::new(title);
        let id = group.id.clone();
        self.groups.push(group);
        id
    }

    /// Rename a group
    pub fn edit_group_title(
        &mut self,
        group_id: &str,
        title: impl Into<String>,
    ) -> Result<(), DeckError> {
        let index = self.group_index(group_id)?;
        self.groups[index].title = title.into();
        Ok(())
    }

    /// Remove a group and everything in it
    ///
    /// The default group is protected. A missing id is a no-op (`Ok(false)`).
    pub fn delete_group(&mut self, group_id: &str) -> Result<bool, DeckError> {
        if group_id == DEFAULT_GROUP_ID {
            return Err(DeckError::DefaultGroupProtected);
        }
        match self.groups.iter().position(|g| g.id == group_id) {
            Some(index) => {
                self.groups.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Move a group to a new position in the column order
    ///
    /// Returns false without touching anything when `from` is out of range or
    /// equal to `to`; `to` is clamped.
    pub fn reorder_groups(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.groups.len() {
            return false;
        }
        let group = self.groups.remove(from);
        let to = to.min(self.groups.len());
        self.groups.insert(to, group);
        true
    }

    // ==================== Bookmark Operations ====================

    /// Append a bookmark to the end of a group
    ///
    /// A blank id is replaced with a generated one; `group_id` is always
    /// rewritten to the owning group. Returns the id actually stored.
    pub fn add_bookmark(
        &mut self,
        mut bookmark: Bookmark,
        group_id: &str,
    ) -> Result<String, DeckError> {
        let index = self.group_index(group_id)?;
        if bookmark.id.is_empty() {
            bookmark.id = Uuid::new_v4().to_string();
        }
        bookmark.group_id = self.groups[index].id.clone();
        let id = bookmark.id.clone();
        self.groups[index].bookmarks.push(bookmark);
        Ok(id)
    }

    /// Replace a bookmark with an edited version
    ///
    /// When the bookmark already lives in `group_id` it is replaced in place,
    /// keeping its position. When the edit targets a different group it is
    /// removed from its old group and appended to the new one. The edit time
    /// is bumped either way. An unknown bookmark id is a no-op (`Ok(false)`).
    pub fn edit_bookmark(
        &mut self,
        bookmark: Bookmark,
        group_id: &str,
    ) -> Result<bool, DeckError> {
        let target = self.group_index(group_id)?;
        let Some((owner, position)) = self.locate(&bookmark.id) else {
            return Ok(false);
        };

        let mut updated = bookmark;
        updated.group_id = self.groups[target].id.clone();
        updated.touch();

        if owner == target {
            self.groups[owner].bookmarks[position] = updated;
        } else {
            self.groups[owner].bookmarks.remove(position);
            self.groups[target].bookmarks.push(updated);
        }
        Ok(true)
    }

    /// Remove a bookmark from a group
    ///
    /// Missing group or bookmark is a no-op.
    pub fn delete_bookmark(&mut self, bookmark_id: &str, group_id: &str) -> bool {
        let Some(group) = self.groups.iter_mut().find(|g| g.id == group_id) else {
            return false;
        };
        match group.position_of(bookmark_id) {
            Some(position) => {
                group.bookmarks.remove(position);
                true
            }
            None => false,
        }
    }

    /// Move a bookmark to a new position within its group
    ///
    /// Remove-then-insert, with `to` clamped to the shortened list, so
    /// applying the inverse move restores the original order. Returns false
    /// when `from` is out of range or equal to `to`.
    pub fn reorder_within_group(
        &mut self,
        group_id: &str,
        from: usize,
        to: usize,
    ) -> Result<bool, DeckError> {
        let index = self.group_index(group_id)?;
        let bookmarks = &mut self.groups[index].bookmarks;
        if from == to || from >= bookmarks.len() {
            return Ok(false);
        }
        let bookmark = bookmarks.remove(from);
        let to = to.min(bookmarks.len());
        bookmarks.insert(to, bookmark);
        Ok(true)
    }

    /// Move a bookmark from one group into another
    ///
    /// Inserts at `to_index`, or appends when it is `None` or past the end.
    /// The bookmark's `group_id` is rewritten. An unknown bookmark id is a
    /// no-op (`Ok(false)`); unknown groups are errors.
    pub fn move_bookmark_between_groups(
        &mut self,
        bookmark_id: &str,
        from_group_id: &str,
        to_group_id: &str,
        to_index: Option<usize>,
    ) -> Result<bool, DeckError> {
        let from = self.group_index(from_group_id)?;
        let to = self.group_index(to_group_id)?;

        let Some(position) = self.groups[from].position_of(bookmark_id) else {
            return Ok(false);
        };

        let mut bookmark = self.groups[from].bookmarks.remove(position);
        bookmark.group_id = self.groups[to].id.clone();

        let bookmarks = &mut self.groups[to].bookmarks;
        let at = match to_index {
            Some(i) if i <= bookmarks.len() => i,
            _ => bookmarks.len(),
        };
        bookmarks.insert(at, bookmark);
        Ok(true)
    }

    /// Record a resolved favicon for a bookmark, wherever it lives now
    ///
    /// Returns false when the bookmark is gone, so stale resolutions are
    /// dropped. Does not count as an edit.
    pub fn set_bookmark_favicon(
        &mut self,
        bookmark_id: &str,
        favicon: impl Into<String>,
    ) -> bool {
        match self.locate(bookmark_id) {
            Some((group, position)) => {
                self.groups[group].bookmarks[position].set_favicon(favicon);
                true
            }
            None => false,
        }
    }

    // ==================== Queries ====================

    /// Get a group by id
    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    /// Get a bookmark by id, searching every group
    pub fn find_bookmark(&self, bookmark_id: &str) -> Option<&Bookmark> {
        self.locate(bookmark_id)
            .map(|(group, position)| &self.groups[group].bookmarks[position])
    }

    /// Get a bookmark by id, failing with a typed error when it is missing
    pub fn get_bookmark(&self, bookmark_id: &str) -> Result<&Bookmark, DeckError> {
        self.find_bookmark(bookmark_id)
            .ok_or_else(|| DeckError::BookmarkNotFound(bookmark_id.to_string()))
    }

    /// The group currently holding a bookmark
    pub fn owning_group(&self, bookmark_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.contains(bookmark_id))
    }

    /// Number of groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of bookmarks across all groups
    pub fn bookmark_count(&self) -> usize {
        self.groups.iter().map(|g| g.bookmarks.len()).sum()
    }

    /// All bookmarks in display order
    pub fn bookmarks(&self) -> impl Iterator<Item = &Bookmark> {
        self.groups.iter().flat_map(|g| g.bookmarks.iter())
    }

    fn group_index(&self, group_id: &str) -> Result<usize, DeckError> {
        self.groups
            .iter()
            .position(|g| g.id == group_id)
            .ok_or_else(|| DeckError::GroupNotFound(group_id.to_string()))
    }

    fn locate(&self, bookmark_id: &str) -> Option<(usize, usize)> {
        self.groups
            .iter()
            .enumerate()
            .find_map(|(i, g)| g.position_of(bookmark_id).map(|p| (i, p)))
    }
}
