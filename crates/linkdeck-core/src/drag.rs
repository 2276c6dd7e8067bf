//! Drag-reorder engine
//!
//! Drives the three-phase grab/hover/drop gesture over the store. A session
//! exists only while a bookmark is held; hover moves mutate the
//! authoritative deck immediately so the UI renders live feedback, the drop
//! settles the final position within the hovered group, and cancelling rolls
//! back to the arrangement captured at grab time.

use anyhow::Result;
use tracing::debug;

use crate::models::Group;
use crate::store::Store;

/// State held while a bookmark is being dragged
#[derive(Debug, Clone)]
pub struct DragSession {
    /// Id of the bookmark being dragged
    pub bookmark_id: String,
    /// Group the bookmark was grabbed from
    pub source_group_id: String,
    /// Arrangement at grab time, restored on cancel
    snapshot: Vec<Group>,
}

/// Drag-and-drop coordinator
///
/// Holding `Option<DragSession>` is the whole state machine: `None` means no
/// drag is active, and every transition below degrades to a no-op when the
/// ids it is handed no longer resolve.
#[derive(Debug, Default)]
pub struct DragEngine {
    session: Option<DragSession>,
}

impl DragEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active session, if a bookmark is currently held
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// Whether a drag is in progress
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Grab a bookmark, starting a drag session
    ///
    /// Nothing mutates yet; the session carries the grabbed id for the
    /// floating preview and a snapshot for rollback. An unknown id starts
    /// no session.
    pub fn start(&mut self, store: &Store, bookmark_id: &str) -> bool {
        let Some(group) = store.deck().owning_group(bookmark_id) else {
            debug!("Drag start ignored, no bookmark {}", bookmark_id);
            return false;
        };

        self.session = Some(DragSession {
            bookmark_id: bookmark_id.to_string(),
            source_group_id: group.id.clone(),
            snapshot: store.groups().to_vec(),
        });
        true
    }

    /// Hover the held bookmark over another bookmark or group
    ///
    /// When the hover target lives in a different group, the held bookmark
    /// moves to the end of that group right away. `over_id` may name a
    /// bookmark or an empty group's drop zone. Cross-group moves are
    /// suppressed while the view is scrolling, so reflow cannot feed the
    /// scroll that caused it. Returns whether the deck changed.
    pub fn over(&mut self, store: &mut Store, over_id: &str, scrolling: bool) -> Result<bool> {
        let Some(session) = &self.session else {
            return Ok(false);
        };
        let active_id = session.bookmark_id.clone();

        if active_id == over_id {
            return Ok(false);
        }

        let deck = store.deck();
        let Some(active_container) = deck.owning_group(&active_id).map(|g| g.id.clone()) else {
            return Ok(false);
        };
        let Some(over_container) = deck
            .owning_group(over_id)
            .or_else(|| deck.group(over_id))
            .map(|g| g.id.clone())
        else {
            return Ok(false);
        };

        if active_container == over_container {
            return Ok(false);
        }

        if scrolling {
            debug!("Drag over suppressed while scrolling");
            return Ok(false);
        }

        debug!(
            "Drag over: moving {} from {} to {}",
            active_id, active_container, over_container
        );
        store.move_bookmark_between_groups(&active_id, &active_container, &over_container, None)
    }

    /// Drop the held bookmark, settling its position
    ///
    /// Both the held bookmark and `over_id` must resolve inside the same
    /// group (the one the bookmark currently sits in after any hover moves);
    /// otherwise the drop changes nothing. The session ends either way.
    pub fn end(&mut self, store: &mut Store, over_id: &str) -> Result<bool> {
        let Some(session) = self.session.take() else {
            return Ok(false);
        };
        let active_id = session.bookmark_id;

        let Some((container_id, from, to)) = resolve_drop(store, &active_id, over_id) else {
            return Ok(false);
        };

        debug!(
            "Drag end: reordering {} from {} to {} in {}",
            active_id, from, to, container_id
        );
        store.reorder_within_group(&container_id, from, to)
    }

    /// Abort the drag, restoring the arrangement captured at grab time
    pub fn cancel(&mut self, store: &mut Store) -> Result<bool> {
        let Some(session) = self.session.take() else {
            return Ok(false);
        };

        if store.groups() == session.snapshot.as_slice() {
            return Ok(false);
        }

        debug!("Drag cancelled, rolling back {}", session.bookmark_id);
        store.restore_groups(session.snapshot)?;
        Ok(true)
    }
}

/// Resolve a drop into (container, from index, to index)
///
/// Returns `None` when the held bookmark is gone or `over_id` does not
/// resolve to a position in the same group.
fn resolve_drop(store: &Store, active_id: &str, over_id: &str) -> Option<(String, usize, usize)> {
    let container = store.deck().owning_group(active_id)?;
    let from = container.position_of(active_id)?;
    let to = container.position_of(over_id)?;
    Some((container.id.clone(), from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::DEFAULT_GROUP_ID;
    use tempfile::TempDir;

    fn test_store(temp_dir: &TempDir) -> Store {
        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            fetch_favicons: false,
            log_file: None,
        };
        Store::open_with_config(config).unwrap()
    }

    fn order(store: &Store, group_id: &str) -> Vec<String> {
        store
            .deck()
            .group(group_id)
            .unwrap()
            .bookmarks
            .iter()
            .map(|b| b.id.clone())
            .collect()
    }

    #[test]
    fn test_start_records_source_group() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        let mut engine = DragEngine::new();

        assert!(engine.start(&store, "kaosc-4"));
        let session = engine.session().unwrap();
        assert_eq!(session.bookmark_id, "kaosc-4");
        assert_eq!(session.source_group_id, "kaosc-groupId");
    }

    #[test]
    fn test_start_unknown_id_is_silent() {
        let temp_dir = TempDir::new().unwrap();
        let store = test_store(&temp_dir);
        let mut engine = DragEngine::new();

        assert!(!engine.start(&store, "ghost"));
        assert!(!engine.is_active());
    }

    #[test]
    fn test_drag_across_groups_and_drop_at_index() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        let mut engine = DragEngine::new();

        engine.start(&store, "default-3");
        // Hovering a bookmark of the other group appends the held one there
        assert!(engine.over(&mut store, "kaosc-1", false).unwrap());
        assert_eq!(
            order(&store, "kaosc-groupId"),
            vec!["kaosc-1", "kaosc-2", "kaosc-3", "kaosc-4", "kaosc-5", "kaosc-6", "kaosc-7", "default-3"]
        );

        // Dropping over the bookmark at index 2 settles it there
        assert!(engine.end(&mut store, "kaosc-3").unwrap());
        assert!(!engine.is_active());

        assert!(!store.deck().group(DEFAULT_GROUP_ID).unwrap().contains("default-3"));
        let target = store.deck().group("kaosc-groupId").unwrap();
        assert_eq!(target.position_of("default-3"), Some(2));
        assert_eq!(target.bookmarks[2].group_id, "kaosc-groupId");
    }

    #[test]
    fn test_drag_within_group_reorders() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        let mut engine = DragEngine::new();

        engine.start(&store, "default-0");
        // Same container, so hovering moves nothing
        assert!(!engine.over(&mut store, "default-2", false).unwrap());

        assert!(engine.end(&mut store, "default-2").unwrap());
        assert_eq!(
            order(&store, DEFAULT_GROUP_ID)[..4],
            ["default-1", "default-2", "default-0", "default-3"]
        );
    }

    #[test]
    fn test_over_self_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        let mut engine = DragEngine::new();

        engine.start(&store, "default-3");
        assert!(!engine.over(&mut store, "default-3", false).unwrap());
        assert_eq!(order(&store, DEFAULT_GROUP_ID).len(), 9);
    }

    #[test]
    fn test_over_unknown_target_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        let mut engine = DragEngine::new();

        engine.start(&store, "default-3");
        let before = store.groups().to_vec();
        assert!(!engine.over(&mut store, "ghost", false).unwrap());
        assert_eq!(store.groups(), before.as_slice());
    }

    #[test]
    fn test_over_while_scrolling_is_suppressed() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        let mut engine = DragEngine::new();

        engine.start(&store, "default-3");
        let before = store.groups().to_vec();
        assert!(!engine.over(&mut store, "kaosc-1", true).unwrap());
        assert_eq!(store.groups(), before.as_slice());

        // Same gesture works once scrolling stops
        assert!(engine.over(&mut store, "kaosc-1", false).unwrap());
    }

    #[test]
    fn test_over_empty_group_drop_zone() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        let empty_id = store.add_group("Empty").unwrap();
        let mut engine = DragEngine::new();

        engine.start(&store, "default-3");
        assert!(engine.over(&mut store, &empty_id, false).unwrap());

        let group = store.deck().group(&empty_id).unwrap();
        assert_eq!(group.bookmarks.len(), 1);
        assert_eq!(group.bookmarks[0].id, "default-3");
        assert_eq!(group.bookmarks[0].group_id, empty_id);
    }

    #[test]
    fn test_over_without_session_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        let mut engine = DragEngine::new();

        assert!(!engine.over(&mut store, "kaosc-1", false).unwrap());
        assert!(!engine.end(&mut store, "kaosc-1").unwrap());
    }

    #[test]
    fn test_end_with_target_in_other_group_keeps_hover_result() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        let mut engine = DragEngine::new();

        engine.start(&store, "default-3");
        engine.over(&mut store, "kaosc-1", false).unwrap();

        // Drop target resolves in the old group, not the current one
        assert!(!engine.end(&mut store, "default-1").unwrap());
        assert!(!engine.is_active());

        // The hover move stands
        let target = store.deck().group("kaosc-groupId").unwrap();
        assert_eq!(target.position_of("default-3"), Some(7));
    }

    #[test]
    fn test_drag_result_persists() {
        let temp_dir = TempDir::new().unwrap();
        let config;
        {
            let mut store = test_store(&temp_dir);
            config = store.config().clone();
            let mut engine = DragEngine::new();
            engine.start(&store, "default-3");
            engine.over(&mut store, "kaosc-1", false).unwrap();
            engine.end(&mut store, "kaosc-3").unwrap();
        }

        let reopened = Store::open_with_config(config).unwrap();
        let target = reopened.deck().group("kaosc-groupId").unwrap();
        assert_eq!(target.position_of("default-3"), Some(2));
    }

    #[test]
    fn test_cancel_rolls_back_hover_moves() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        let mut engine = DragEngine::new();

        let before = store.groups().to_vec();
        engine.start(&store, "default-3");
        engine.over(&mut store, "kaosc-1", false).unwrap();
        assert_ne!(store.groups(), before.as_slice());

        assert!(engine.cancel(&mut store).unwrap());
        assert!(!engine.is_active());
        assert_eq!(store.groups(), before.as_slice());
    }

    #[test]
    fn test_cancel_without_moves_changes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        let mut engine = DragEngine::new();

        engine.start(&store, "default-3");
        assert!(!engine.cancel(&mut store).unwrap());
        assert!(!engine.is_active());
    }
}
