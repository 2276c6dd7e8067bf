//! Application state for the TUI

use std::time::{Duration, Instant};

use anyhow::Result;
use linkdeck_core::{Bookmark, DragEngine, Store, DEFAULT_GROUP_ID};

use crate::browser;

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Command input mode (after pressing : or a command key)
    Command,
    /// A bookmark is held and follows the cursor
    Move,
}

/// Type of command being entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    /// Generic command starting with :
    Generic,
    /// Add a new bookmark
    Add,
    /// Add a new group
    AddGroup,
    /// Rename the targeted group
    RenameGroup,
    /// Edit the selected bookmark's title
    EditTitle,
    /// Edit the selected bookmark's URL
    EditUrl,
}

/// Which pane is currently active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    Groups,
    Items,
    Detail,
}

impl ActivePane {
    pub fn next(&self) -> Self {
        match self {
            ActivePane::Groups => ActivePane::Items,
            ActivePane::Items => ActivePane::Detail,
            ActivePane::Detail => ActivePane::Groups,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            ActivePane::Groups => ActivePane::Detail,
            ActivePane::Items => ActivePane::Groups,
            ActivePane::Detail => ActivePane::Items,
        }
    }
}

/// One row of the items pane
///
/// Groups render inline as header rows above their bookmarks, so a header
/// doubles as the drop zone for moving a bookmark into that group.
#[derive(Debug, Clone)]
pub enum Row {
    Header {
        group_id: String,
        title: String,
        count: usize,
    },
    Bookmark(Bookmark),
}

impl Row {
    /// Id this row resolves to as a hover target
    pub fn over_id(&self) -> &str {
        match self {
            Row::Header { group_id, .. } => group_id,
            Row::Bookmark(bookmark) => &bookmark.id,
        }
    }

    /// Group this row belongs to
    pub fn group_id(&self) -> &str {
        match self {
            Row::Header { group_id, .. } => group_id,
            Row::Bookmark(bookmark) => &bookmark.group_id,
        }
    }
}

/// Groups-pane listing entry
#[derive(Debug, Clone)]
pub struct GroupEntry {
    pub id: String,
    pub title: String,
    pub count: usize,
}

/// Outcome of executing a command
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    Done,
    /// A favicon fetch should be started for this bookmark
    NeedFavicon { bookmark_id: String, url: String },
}

/// Main application state
pub struct App {
    /// Whether the app should quit
    pub should_quit: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Type of command being entered
    pub command_type: Option<CommandType>,
    /// Current command input buffer
    pub command_input: String,
    /// Cursor position in command input
    pub command_cursor: usize,
    /// Currently active pane
    pub active_pane: ActivePane,
    /// Groups-pane listing
    pub groups: Vec<GroupEntry>,
    /// Selected index in the groups pane
    pub group_index: usize,
    /// Items-pane rows (group headers interleaved with bookmarks)
    pub rows: Vec<Row>,
    /// Selected row in the items pane
    pub row_index: usize,
    /// Scroll offset in the detail pane
    pub detail_scroll: u16,
    /// Status message to display
    pub status_message: Option<String>,
    /// When the status message was set
    pub status_message_time: Option<Instant>,
    /// Error message shown as a modal overlay
    pub error_message: Option<String>,
    /// Last deleted bookmark, kept for undo
    pub deleted_bookmark: Option<Bookmark>,
    /// Group delete awaiting a confirming second press
    pub pending_delete: Option<(String, Instant)>,
    /// Pending 'g' keypress for the gg sequence
    pub pending_g: Option<Instant>,
    /// Whether the help overlay is shown
    pub show_help: bool,
    /// Drag state while a bookmark is held in move mode
    pub drag: DragEngine,
    /// Number of favicon fetches in flight
    pub fetching: usize,
    /// Whether favicon fetching is enabled
    pub fetch_enabled: bool,
}

impl App {
    pub fn new(store: &Store) -> Self {
        let mut app = Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            command_type: None,
            command_input: String::new(),
            command_cursor: 0,
            active_pane: ActivePane::Items,
            groups: Vec::new(),
            group_index: 0,
            rows: Vec::new(),
            row_index: 0,
            detail_scroll: 0,
            status_message: None,
            status_message_time: None,
            error_message: None,
            deleted_bookmark: None,
            pending_delete: None,
            pending_g: None,
            show_help: false,
            drag: DragEngine::new(),
            fetching: 0,
            fetch_enabled: store.config().fetch_favicons,
        };
        app.refresh(store);
        app
    }

    /// Rebuild pane data from the store, clamping the selections
    pub fn refresh(&mut self, store: &Store) {
        self.groups = store
            .groups()
            .iter()
            .map(|group| GroupEntry {
                id: group.id.clone(),
                title: group.title.clone(),
                count: group.bookmarks.len(),
            })
            .collect();

        self.rows.clear();
        for group in store.groups() {
            self.rows.push(Row::Header {
                group_id: group.id.clone(),
                title: group.title.clone(),
                count: group.bookmarks.len(),
            });
            for bookmark in &group.bookmarks {
                self.rows.push(Row::Bookmark(bookmark.clone()));
            }
        }

        if self.rows.is_empty() {
            self.row_index = 0;
        } else {
            self.row_index = self.row_index.min(self.rows.len() - 1);
        }
        if self.groups.is_empty() {
            self.group_index = 0;
        } else {
            self.group_index = self.group_index.min(self.groups.len() - 1);
        }
    }

    /// Point the items selection at a bookmark's row
    pub fn select_bookmark(&mut self, bookmark_id: &str) {
        if let Some(index) = self.rows.iter().position(|row| {
            matches!(row, Row::Bookmark(bookmark) if bookmark.id == bookmark_id)
        }) {
            self.row_index = index;
        }
    }

    pub fn current_row(&self) -> Option<&Row> {
        self.rows.get(self.row_index)
    }

    /// The bookmark under the items cursor, if the row is one
    pub fn current_bookmark(&self) -> Option<&Bookmark> {
        match self.current_row() {
            Some(Row::Bookmark(bookmark)) => Some(bookmark),
            _ => None,
        }
    }

    /// Group an action applies to: the groups-pane selection when that pane
    /// is active, otherwise the group under the items cursor.
    pub fn target_group_id(&self) -> Option<String> {
        match self.active_pane {
            ActivePane::Groups => self.groups.get(self.group_index).map(|g| g.id.clone()),
            _ => self.current_row().map(|row| row.group_id().to_string()),
        }
    }

    fn target_group_title(&self) -> Option<String> {
        let group_id = self.target_group_id()?;
        self.groups
            .iter()
            .find(|entry| entry.id == group_id)
            .map(|entry| entry.title.clone())
    }

    pub fn move_up(&mut self) {
        match self.active_pane {
            ActivePane::Groups => {
                if self.group_index > 0 {
                    self.group_index -= 1;
                }
            }
            ActivePane::Items => {
                if self.row_index > 0 {
                    self.row_index -= 1;
                    self.detail_scroll = 0;
                }
            }
            ActivePane::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
            }
        }
    }

    pub fn move_down(&mut self) {
        match self.active_pane {
            ActivePane::Groups => {
                if self.group_index + 1 < self.groups.len() {
                    self.group_index += 1;
                }
            }
            ActivePane::Items => {
                if self.row_index + 1 < self.rows.len() {
                    self.row_index += 1;
                    self.detail_scroll = 0;
                }
            }
            ActivePane::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
            }
        }
    }

    pub fn move_to_first(&mut self) {
        match self.active_pane {
            ActivePane::Groups => self.group_index = 0,
            ActivePane::Items => {
                self.row_index = 0;
                self.detail_scroll = 0;
            }
            ActivePane::Detail => self.detail_scroll = 0,
        }
    }

    pub fn move_to_last(&mut self) {
        match self.active_pane {
            ActivePane::Groups => {
                if !self.groups.is_empty() {
                    self.group_index = self.groups.len() - 1;
                }
            }
            ActivePane::Items => {
                if !self.rows.is_empty() {
                    self.row_index = self.rows.len() - 1;
                    self.detail_scroll = 0;
                }
            }
            ActivePane::Detail => {}
        }
    }

    /// Jump the selection ten rows down
    pub fn page_down(&mut self) {
        match self.active_pane {
            ActivePane::Items => {
                if !self.rows.is_empty() {
                    self.row_index = (self.row_index + 10).min(self.rows.len() - 1);
                    self.detail_scroll = 0;
                }
            }
            ActivePane::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_add(10);
            }
            ActivePane::Groups => {}
        }
    }

    /// Jump the selection ten rows up
    pub fn page_up(&mut self) {
        match self.active_pane {
            ActivePane::Items => {
                self.row_index = self.row_index.saturating_sub(10);
                self.detail_scroll = 0;
            }
            ActivePane::Detail => {
                self.detail_scroll = self.detail_scroll.saturating_sub(10);
            }
            ActivePane::Groups => {}
        }
    }

    pub fn next_pane(&mut self) {
        self.active_pane = self.active_pane.next();
    }

    pub fn prev_pane(&mut self) {
        self.active_pane = self.active_pane.prev();
    }

    /// Activate the selection: focus a group's rows, or open a bookmark
    pub fn handle_enter(&mut self) {
        match self.active_pane {
            ActivePane::Groups => {
                if let Some(id) = self.groups.get(self.group_index).map(|g| g.id.clone()) {
                    if let Some(index) = self.rows.iter().position(
                        |row| matches!(row, Row::Header { group_id, .. } if *group_id == id),
                    ) {
                        self.row_index = index;
                        self.detail_scroll = 0;
                    }
                    self.active_pane = ActivePane::Items;
                }
            }
            ActivePane::Items => self.open_current(),
            ActivePane::Detail => {}
        }
    }

    /// Open the selected bookmark in the default browser
    pub fn open_current(&mut self) {
        let Some((title, url)) = self
            .current_bookmark()
            .map(|b| (b.title.clone(), b.url.clone()))
        else {
            return;
        };

        match browser::open_url(&url) {
            Ok(()) => self.set_status(format!("Opened '{}'", title)),
            Err(e) => self.set_status(format!("Failed to open: {}", e)),
        }
    }

    pub fn enter_command_mode(&mut self, cmd_type: CommandType) {
        self.input_mode = InputMode::Command;
        self.command_type = Some(cmd_type);
        self.command_input.clear();
        self.command_cursor = 0;

        // Pre-fill based on command type
        match cmd_type {
            CommandType::Add => {
                self.command_input = "add ".to_string();
            }
            CommandType::AddGroup => {
                self.command_input = "group ".to_string();
            }
            CommandType::RenameGroup => {
                let title = self.target_group_title().unwrap_or_default();
                self.command_input = format!("rename {}", title);
            }
            CommandType::EditTitle => {
                let title = self
                    .current_bookmark()
                    .map(|b| b.title.clone())
                    .unwrap_or_default();
                self.command_input = format!("title {}", title);
            }
            CommandType::EditUrl => {
                let url = self
                    .current_bookmark()
                    .map(|b| b.url.clone())
                    .unwrap_or_default();
                self.command_input = format!("url {}", url);
            }
            CommandType::Generic => {}
        }
        self.command_cursor = self.command_input.len();
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command_type = None;
        self.command_input.clear();
        self.command_cursor = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        self.command_input.insert(self.command_cursor, c);
        self.command_cursor += 1;
    }

    pub fn delete_char(&mut self) {
        if self.command_cursor > 0 {
            self.command_cursor -= 1;
            self.command_input.remove(self.command_cursor);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.command_cursor > 0 {
            self.command_cursor -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.command_cursor < self.command_input.len() {
            self.command_cursor += 1;
        }
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_message_time = Some(Instant::now());
    }

    /// Clear the status message and any pending confirmation after 3 seconds
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if time.elapsed() > Duration::from_secs(3) {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
        if let Some((_, time)) = &self.pending_delete {
            if time.elapsed() > Duration::from_secs(3) {
                self.pending_delete = None;
            }
        }
    }

    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
    }

    pub fn has_error(&self) -> bool {
        self.error_message.is_some()
    }

    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Delete the selected bookmark, keeping it for undo
    pub fn delete_current_bookmark(&mut self, store: &mut Store) -> Result<()> {
        let Some(bookmark) = self.current_bookmark().cloned() else {
            return Ok(());
        };

        let saved_index = self.row_index;
        store.delete_bookmark(&bookmark.id, &bookmark.group_id)?;
        self.set_status(format!("Deleted '{}'. Press u to undo", bookmark.title));
        self.deleted_bookmark = Some(bookmark);
        self.refresh(store);
        if !self.rows.is_empty() {
            self.row_index = saved_index.min(self.rows.len() - 1);
        }
        Ok(())
    }

    /// Restore the last deleted bookmark to the end of its group
    pub fn undo_delete(&mut self, store: &mut Store) -> Result<()> {
        let Some(bookmark) = self.deleted_bookmark.take() else {
            self.set_status("Nothing to undo".to_string());
            return Ok(());
        };

        let group_id = bookmark.group_id.clone();
        let title = bookmark.title.clone();
        store.add_bookmark(bookmark, &group_id)?;
        self.set_status(format!("Restored '{}'", title));
        self.refresh(store);
        Ok(())
    }

    /// Delete the targeted group; a second press within 3 seconds confirms
    pub fn delete_current_group(&mut self, store: &mut Store) -> Result<()> {
        let Some(group_id) = self.target_group_id() else {
            return Ok(());
        };
        let Some((title, count, is_default)) = store
            .deck()
            .group(&group_id)
            .map(|g| (g.title.clone(), g.bookmarks.len(), g.is_default()))
        else {
            return Ok(());
        };

        if is_default {
            self.set_status("The default group cannot be deleted".to_string());
            return Ok(());
        }

        match self.pending_delete.take() {
            Some((pending_id, _)) if pending_id == group_id => {
                store.delete_group(&group_id)?;
                self.set_status(format!("Deleted group '{}'", title));
                self.refresh(store);
            }
            _ => {
                self.pending_delete = Some((group_id, Instant::now()));
                self.set_status(format!(
                    "Press d again to delete '{}' ({} bookmarks)",
                    title, count
                ));
            }
        }
        Ok(())
    }

    /// Move the selected group one position up or down
    pub fn shift_group(&mut self, store: &mut Store, down: bool) -> Result<()> {
        let from = self.group_index;
        let to = if down { from + 1 } else { from.saturating_sub(1) };
        if to >= self.groups.len() {
            return Ok(());
        }

        if store.reorder_groups(from, to)? {
            self.group_index = to;
            self.refresh(store);
        }
        Ok(())
    }

    /// Grab the selected bookmark, entering move mode
    pub fn enter_move_mode(&mut self, store: &Store) {
        let Some((id, title)) = self
            .current_bookmark()
            .map(|b| (b.id.clone(), b.title.clone()))
        else {
            self.set_status("Select a bookmark to move".to_string());
            return;
        };

        if self.drag.start(store, &id) {
            self.input_mode = InputMode::Move;
            self.set_status(format!("Moving '{}'", title));
        }
    }

    /// Hover the held bookmark over the row under the cursor
    ///
    /// A cross-group hover moves the bookmark immediately, so the cursor is
    /// re-pointed at its row in the rebuilt listing.
    fn hover_current(&mut self, store: &mut Store, scrolling: bool) -> Result<()> {
        let Some(active_id) = self.drag.session().map(|s| s.bookmark_id.clone()) else {
            return Ok(());
        };
        let Some(over_id) = self.current_row().map(|row| row.over_id().to_string()) else {
            return Ok(());
        };

        if self.drag.over(store, &over_id, scrolling)? {
            self.refresh(store);
            self.select_bookmark(&active_id);
        }
        Ok(())
    }

    /// Step the hover cursor one row
    pub fn hover_step(&mut self, store: &mut Store, down: bool) -> Result<()> {
        if down {
            if self.row_index + 1 < self.rows.len() {
                self.row_index += 1;
            }
        } else if self.row_index > 0 {
            self.row_index -= 1;
        }
        self.hover_current(store, false)
    }

    /// Jump the hover cursor to the previous or next group header
    pub fn hover_group(&mut self, store: &mut Store, forward: bool) -> Result<()> {
        let target = if forward {
            self.rows
                .iter()
                .enumerate()
                .skip(self.row_index + 1)
                .find(|(_, row)| matches!(row, Row::Header { .. }))
                .map(|(i, _)| i)
        } else {
            self.rows
                .iter()
                .enumerate()
                .take(self.row_index)
                .rev()
                .find(|(_, row)| matches!(row, Row::Header { .. }))
                .map(|(i, _)| i)
        };

        if let Some(index) = target {
            self.row_index = index;
            self.hover_current(store, false)?;
        }
        Ok(())
    }

    /// Page the hover cursor; counts as scrolling, so no hover applies
    pub fn hover_page(&mut self, store: &mut Store, down: bool) -> Result<()> {
        if self.rows.is_empty() {
            return Ok(());
        }
        self.row_index = if down {
            (self.row_index + 10).min(self.rows.len() - 1)
        } else {
            self.row_index.saturating_sub(10)
        };
        self.hover_current(store, true)
    }

    /// Drop the held bookmark at the hovered position
    pub fn drop_move(&mut self, store: &mut Store) -> Result<()> {
        let Some(active_id) = self.drag.session().map(|s| s.bookmark_id.clone()) else {
            self.input_mode = InputMode::Normal;
            return Ok(());
        };

        // Dropping on a header settles wherever the hover left the bookmark
        let over_id = match self.current_row() {
            Some(Row::Bookmark(bookmark)) => bookmark.id.clone(),
            _ => active_id.clone(),
        };

        self.drag.end(store, &over_id)?;
        self.input_mode = InputMode::Normal;
        self.refresh(store);
        self.select_bookmark(&active_id);

        let title = store
            .deck()
            .find_bookmark(&active_id)
            .map(|b| b.title.clone())
            .unwrap_or_default();
        self.set_status(format!("Moved '{}'", title));
        Ok(())
    }

    /// Cancel the move, restoring the pre-move arrangement
    pub fn cancel_move(&mut self, store: &mut Store) -> Result<()> {
        let active_id = self.drag.session().map(|s| s.bookmark_id.clone());
        let restored = self.drag.cancel(store)?;
        self.input_mode = InputMode::Normal;
        self.refresh(store);
        if let Some(id) = active_id {
            self.select_bookmark(&id);
        }
        if restored {
            self.set_status("Move cancelled".to_string());
        }
        Ok(())
    }

    /// Parse and execute the command input buffer
    pub fn execute_command(&mut self, store: &mut Store) -> Result<CommandResult> {
        let input = self.command_input.trim().to_string();

        if let Some(rest) = input.strip_prefix("add ") {
            let url = rest.trim();
            if url.is_empty() {
                self.set_status("Usage: add <url>".to_string());
                return Ok(CommandResult::Done);
            }
            let group_id = self
                .target_group_id()
                .unwrap_or_else(|| DEFAULT_GROUP_ID.to_string());
            let bookmark_id = store.add_bookmark(Bookmark::new(url, url), &group_id)?;
            self.refresh(store);
            self.select_bookmark(&bookmark_id);
            self.set_status("Added bookmark".to_string());
            return Ok(CommandResult::NeedFavicon {
                bookmark_id,
                url: url.to_string(),
            });
        } else if let Some(rest) = input.strip_prefix("group ") {
            let title = rest.trim();
            if title.is_empty() {
                self.set_status("Usage: group <title>".to_string());
                return Ok(CommandResult::Done);
            }
            store.add_group(title)?;
            self.refresh(store);
            self.set_status(format!("Added group '{}'", title));
        } else if let Some(rest) = input.strip_prefix("rename ") {
            let title = rest.trim();
            if let Some(group_id) = self.target_group_id() {
                if !title.is_empty() {
                    store.edit_group_title(&group_id, title)?;
                    self.refresh(store);
                    self.set_status("Group renamed".to_string());
                }
            }
        } else if let Some(rest) = input.strip_prefix("title ") {
            let title = rest.trim();
            if let Some(bookmark) = self.current_bookmark().cloned() {
                if !title.is_empty() {
                    let mut updated = bookmark;
                    updated.set_title(title);
                    let group_id = updated.group_id.clone();
                    store.edit_bookmark(updated, &group_id)?;
                    self.refresh(store);
                    self.set_status("Title updated".to_string());
                }
            }
        } else if let Some(rest) = input.strip_prefix("url ") {
            let url = rest.trim();
            if let Some(bookmark) = self.current_bookmark().cloned() {
                if !url.is_empty() && url != bookmark.url {
                    let mut updated = bookmark;
                    updated.set_url(url);
                    let bookmark_id = updated.id.clone();
                    let group_id = updated.group_id.clone();
                    store.edit_bookmark(updated, &group_id)?;
                    self.refresh(store);
                    self.set_status("URL updated".to_string());
                    return Ok(CommandResult::NeedFavicon {
                        bookmark_id,
                        url: url.to_string(),
                    });
                }
            }
        } else if input == "delete" || input == "d" {
            self.delete_current_bookmark(store)?;
        } else if input == "q" || input == "quit" {
            self.should_quit = true;
        } else if !input.is_empty() {
            self.set_status(format!("Unknown command: {}", input));
        }

        Ok(CommandResult::Done)
    }
}
