//! Linkdeck TUI
//!
//! Terminal user interface for linkdeck - grouped bookmark management.
//!
//! ## Panes
//!
//! Three panes:
//! - Left: groups
//! - Middle: group headers interleaved with their bookmarks
//! - Right: detail preview of the selected bookmark
//!
//! ## Moving around
//!
//! - j/k or ↑/↓: move the selection
//! - h/l or ←/→: change the focused pane
//! - Tab / Shift+Tab: cycle panes
//! - Enter: focus a group, or open the selected bookmark in the browser
//! - q or Ctrl+c: quit
//!
//! ## Editing
//!
//! - a: add bookmark
//! - A: add group
//! - t: edit bookmark title
//! - U: edit bookmark URL
//! - r: rename group
//! - m: move bookmark (drag through the list)
//! - d: delete bookmark (dd deletes a group)
//! - u: undo the last bookmark delete
//! - : opens the command line

mod app;
mod fetch;
mod ui;

use std::fs::File;
use std::io::stdout;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use linkdeck_core::{Config, Store};
use ratatui::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::{ActivePane, App, CommandResult, CommandType, InputMode};
use fetch::{FaviconEvent, FetchHandle};

/// Launch the TUI and block until the user quits
pub async fn run(config_path: Option<&PathBuf>) -> Result<()> {
    let config = Config::load_with_cli_override(config_path)?;

    // Initialize TUI logging (file-based, only if LINKDECK_LOG is set)
    init_tui_logging(&config);

    // Open the store
    let mut store = Store::open_with_config(config)?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    // Create app
    let mut app = App::new(&store);
    let mut fetch = FetchHandle::new(store.config());

    // Run app
    let result = run_app(&mut terminal, &mut app, &mut store, &mut fetch).await;

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    store: &mut Store,
    fetch: &mut FetchHandle,
) -> Result<()> {
    loop {
        // Expire stale status messages
        app.check_status_timeout();

        // Draw UI
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Favicon completions take priority; otherwise tick and poll for input
        tokio::select! {
            biased;

            Some(event) = fetch.event_rx.recv() => {
                apply_favicon_event(app, store, event);
            }

            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if event::poll(std::time::Duration::from_millis(0))? {
                    if let Event::Key(key) = event::read()? {
                        // Ignore key repeat and release events
                        if key.kind != KeyEventKind::Press {
                            continue;
                        }

                        // Any key closes an open error modal
                        if app.has_error() {
                            app.clear_error();
                            continue;
                        }

                        // Same for the help overlay
                        if app.show_help {
                            app.show_help = false;
                            continue;
                        }

                        match app.input_mode {
                            InputMode::Normal => {
                                handle_normal_mode(app, store, key.code, key.modifiers);
                            }
                            InputMode::Command => {
                                handle_command_mode(app, store, fetch, key.code, key.modifiers);
                            }
                            InputMode::Move => {
                                handle_move_mode(app, store, key.code, key.modifiers);
                            }
                        }
                    }
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Normal mode: navigation plus the command shortcuts
fn handle_normal_mode(app: &mut App, store: &mut Store, code: KeyCode, modifiers: KeyModifiers) {
    // Navigation keys dismiss the status line
    match code {
        KeyCode::Char('j')
        | KeyCode::Char('k')
        | KeyCode::Up
        | KeyCode::Down
        | KeyCode::Char('h')
        | KeyCode::Char('l')
        | KeyCode::Left
        | KeyCode::Right
        | KeyCode::Tab
        | KeyCode::BackTab
        | KeyCode::Char('g')
        | KeyCode::Char('G') => {
            app.status_message = None;
        }
        _ => {}
    }

    // A second 'g' must land within 500ms
    if let Some(time) = app.pending_g {
        if time.elapsed() > std::time::Duration::from_millis(500) {
            app.pending_g = None;
        }
    }

    match code {
        // Quit
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }

        // Page jumps
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.page_down();
        }
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.page_up();
        }

        // Selection up/down
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_up();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_down();
        }

        // Pane focus
        KeyCode::Char('h') | KeyCode::Left => {
            app.prev_pane();
        }
        KeyCode::Char('l') | KeyCode::Right => {
            app.next_pane();
        }
        KeyCode::Tab => {
            app.next_pane();
        }
        KeyCode::BackTab => {
            app.prev_pane();
        }

        // Enter: focus group / open bookmark
        KeyCode::Enter => {
            app.handle_enter();
        }

        // Open in browser
        KeyCode::Char('o') => {
            app.open_current();
        }

        // Prefilled command-line shortcuts
        KeyCode::Char('a') => {
            app.enter_command_mode(CommandType::Add);
        }
        KeyCode::Char('A') => {
            app.enter_command_mode(CommandType::AddGroup);
        }
        KeyCode::Char('t') => {
            app.enter_command_mode(CommandType::EditTitle);
        }
        KeyCode::Char('U') => {
            app.enter_command_mode(CommandType::EditUrl);
        }
        KeyCode::Char('r') => {
            app.enter_command_mode(CommandType::RenameGroup);
        }

        // Move mode
        KeyCode::Char('m') => {
            app.enter_move_mode(store);
        }

        // Delete (bookmark, or group with a confirming second press)
        KeyCode::Char('d') => {
            if let Err(e) = handle_delete(app, store) {
                app.set_error(format!("Failed to delete: {}", e));
            }
        }
        KeyCode::Char('u') => {
            if let Err(e) = app.undo_delete(store) {
                app.set_error(format!("Failed to undo delete: {}", e));
            }
        }

        // Reorder groups
        KeyCode::Char('J') if app.active_pane == ActivePane::Groups => {
            if let Err(e) = app.shift_group(store, true) {
                app.set_error(format!("Failed to move group: {}", e));
            }
        }
        KeyCode::Char('K') if app.active_pane == ActivePane::Groups => {
            if let Err(e) = app.shift_group(store, false) {
                app.set_error(format!("Failed to move group: {}", e));
            }
        }

        // Command mode
        KeyCode::Char(':') => {
            app.enter_command_mode(CommandType::Generic);
        }

        // Help
        KeyCode::Char('?') => {
            app.toggle_help();
        }

        // G jumps to the end
        KeyCode::Char('G') => {
            app.pending_g = None;
            app.move_to_last();
        }

        // gg jumps to the top
        KeyCode::Char('g') => {
            if app.pending_g.is_some() {
                app.pending_g = None;
                app.move_to_first();
            } else {
                // Arm and wait for the second g
                app.pending_g = Some(std::time::Instant::now());
            }
        }

        _ => {
            // Anything else disarms a pending g
            app.pending_g = None;
        }
    }
}

/// d deletes the selected bookmark; on a group row or in the groups pane it
/// starts the two-press group delete instead.
fn handle_delete(app: &mut App, store: &mut Store) -> Result<()> {
    match app.active_pane {
        ActivePane::Groups => app.delete_current_group(store),
        ActivePane::Items => {
            if app.current_bookmark().is_some() {
                app.delete_current_bookmark(store)
            } else {
                app.delete_current_group(store)
            }
        }
        ActivePane::Detail => Ok(()),
    }
}

/// Command mode: line editing until Enter submits or Esc abandons
fn handle_command_mode(
    app: &mut App,
    store: &mut Store,
    fetch: &FetchHandle,
    code: KeyCode,
    modifiers: KeyModifiers,
) {
    match code {
        KeyCode::Esc => {
            app.exit_input_mode();
        }
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.exit_input_mode();
        }

        // Submit
        KeyCode::Enter => {
            let result = match app.execute_command(store) {
                Ok(r) => r,
                Err(e) => {
                    app.set_error(format!("Command failed: {}", e));
                    app.exit_input_mode();
                    return;
                }
            };
            app.exit_input_mode();

            if let CommandResult::NeedFavicon { bookmark_id, url } = result {
                if fetch.spawn(bookmark_id, url) {
                    app.fetching += 1;
                }
            }
        }

        // Line editing
        KeyCode::Char(c) => app.insert_char(c),
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        _ => {}
    }
}

/// Move mode: hover keys steering an in-flight bookmark move
fn handle_move_mode(app: &mut App, store: &mut Store, code: KeyCode, modifiers: KeyModifiers) {
    let result = match code {
        // Page jumps pass through as scrolling, so no hover applies
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.hover_page(store, true)
        }
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.hover_page(store, false)
        }
        KeyCode::Char('j') | KeyCode::Down => app.hover_step(store, true),
        KeyCode::Char('k') | KeyCode::Up => app.hover_step(store, false),
        KeyCode::Char('l') | KeyCode::Right => app.hover_group(store, true),
        KeyCode::Char('h') | KeyCode::Left => app.hover_group(store, false),
        KeyCode::Enter | KeyCode::Char('m') => app.drop_move(store),
        KeyCode::Esc => app.cancel_move(store),
        _ => Ok(()),
    };

    if let Err(e) = result {
        app.set_error(format!("Move failed: {}", e));
    }
}

/// Apply a finished favicon fetch
///
/// The bookmark may have been deleted while the fetch ran; the store drops
/// the favicon in that case. A fetched page title only replaces a title
/// that is still the bare URL.
fn apply_favicon_event(app: &mut App, store: &mut Store, event: FaviconEvent) {
    let FaviconEvent::Resolved {
        bookmark_id,
        favicon,
        title,
    } = event;
    app.fetching = app.fetching.saturating_sub(1);

    match store.set_bookmark_favicon(&bookmark_id, favicon) {
        Ok(true) => {}
        Ok(false) => return,
        Err(e) => {
            app.set_error(format!("Failed to store favicon: {}", e));
            return;
        }
    }

    if let Some(title) = title {
        let placeholder_titled = store
            .deck()
            .find_bookmark(&bookmark_id)
            .filter(|b| b.title == b.url)
            .cloned();
        if let Some(mut bookmark) = placeholder_titled {
            bookmark.set_title(title);
            let group_id = bookmark.group_id.clone();
            if let Err(e) = store.edit_bookmark(bookmark, &group_id) {
                app.set_error(format!("Failed to store page title: {}", e));
            }
        }
    }

    app.refresh(store);
}

fn init_tui_logging(config: &Config) {
    // Only log if LINKDECK_LOG is set
    let Ok(log_level) = std::env::var("LINKDECK_LOG") else {
        return;
    };

    let log_path = config.log_file_path();

    // The alternate screen owns stdout, so logs go to a file
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            return;
        }
    };

    let env_filter = EnvFilter::new(format!(
        "linkdeck_core={},linkdeck_cli={}",
        log_level, log_level
    ));

    // try_init keeps a second in-process run from panicking
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(log_file)
        .try_init();

    info!("TUI logging initialized to {:?}", log_path);
}
