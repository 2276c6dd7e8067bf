//! Frame rendering for the three-pane layout

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use linkdeck_core::PLACEHOLDER_ICON;

use super::app::{ActivePane, App, InputMode, Row};

/// Render one frame
pub fn draw(frame: &mut Frame, app: &App) {
    // Reserve one line at the bottom for the status bar
    let outer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    // Groups / bookmarks / detail, left to right
    let pane_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(45),
            Constraint::Percentage(35),
        ])
        .split(outer_chunks[0]);

    draw_groups_pane(frame, app, pane_chunks[0]);
    draw_items_pane(frame, app, pane_chunks[1]);
    draw_detail_pane(frame, app, pane_chunks[2]);

    // Draw fetch indicator in top-right corner
    draw_fetch_indicator(frame, app);

    // Draw status bar or input line
    match app.input_mode {
        InputMode::Normal => draw_status_bar(frame, app, outer_chunks[1]),
        InputMode::Command => draw_command_input(frame, app, outer_chunks[1]),
        InputMode::Move => draw_move_bar(frame, outer_chunks[1]),
    }

    // Overlays go last so they sit above the panes
    if app.show_help {
        draw_help_overlay(frame);
    }

    // Draw error overlay on top of everything else
    if let Some(message) = &app.error_message {
        draw_error_overlay(frame, message);
    }
}

/// Draw the groups pane (left)
fn draw_groups_pane(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.active_pane == ActivePane::Groups;

    let items: Vec<ListItem> = app
        .groups
        .iter()
        .map(|group| {
            let line = Line::from(vec![
                Span::raw(group.title.clone()),
                Span::styled(
                    format!(" ({})", group.count),
                    Style::default().add_modifier(Modifier::DIM),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let border_style = if is_active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let block = Block::default()
        .title(" Groups ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let highlight_style = if is_active {
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style);

    let mut state = ListState::default();
    state.select(Some(app.group_index));

    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the bookmarks pane (middle)
fn draw_items_pane(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.active_pane == ActivePane::Items;
    let moving_id = app.drag.session().map(|s| s.bookmark_id.as_str());

    let items: Vec<ListItem> = app
        .rows
        .iter()
        .map(|row| match row {
            Row::Header { title, count, .. } => ListItem::new(Line::from(vec![Span::styled(
                format!("▸ {} ({})", title, count),
                Style::default().add_modifier(Modifier::BOLD),
            )])),
            Row::Bookmark(bookmark) => {
                // Clip both lines to the pane width
                let max_len = area.width.saturating_sub(6) as usize;
                let title = clip(&bookmark.title, max_len);
                let url = clip(&bookmark.url, max_len.saturating_sub(2));

                let title_style = if moving_id == Some(bookmark.id.as_str()) {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };

                let content = Line::from(vec![Span::styled(format!("  {}", title), title_style)]);

                let url_line = Line::from(vec![Span::styled(
                    format!("  {}", url),
                    Style::default().add_modifier(Modifier::DIM),
                )]);

                ListItem::new(vec![content, url_line])
            }
        })
        .collect();

    let border_style = if is_active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let bookmark_count: usize = app.groups.iter().map(|g| g.count).sum();
    let title = if app.input_mode == InputMode::Move {
        " Bookmarks (moving) ".to_string()
    } else {
        format!(" Bookmarks ({}) ", bookmark_count)
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let highlight_style = if is_active {
        Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::REVERSED)
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style);

    let mut state = ListState::default();
    if !app.rows.is_empty() {
        state.select(Some(app.row_index));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the detail preview (right)
fn draw_detail_pane(frame: &mut Frame, app: &App, area: Rect) {
    let is_active = app.active_pane == ActivePane::Detail;

    let border_style = if is_active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let block = Block::default()
        .title(" Detail ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let content = if let Some(bookmark) = app.current_bookmark() {
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Title: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(&bookmark.title),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("URL: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(&bookmark.url),
            ]),
        ];

        // Group
        let group_title = app
            .groups
            .iter()
            .find(|g| g.id == bookmark.group_id)
            .map(|g| g.title.as_str())
            .unwrap_or(bookmark.group_id.as_str());
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Group: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(group_title),
        ]));

        // Favicon
        let favicon = if bookmark.favicon == PLACEHOLDER_ICON {
            "-"
        } else {
            bookmark.favicon.as_str()
        };
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Favicon: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(favicon),
        ]));

        // Edited
        let edited = chrono::DateTime::from_timestamp_millis(bookmark.edited_time)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| bookmark.edited_time.to_string());
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Edited: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(edited),
        ]));

        lines
    } else {
        vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Select a bookmark to view details",
                Style::default().add_modifier(Modifier::DIM),
            )]),
        ]
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.detail_scroll, 0));

    frame.render_widget(paragraph, area);
}

/// Bottom line: status message, or the default key hints
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let content = if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        "a:add  t:title  U:url  m:move  d:del  u:undo  r:rename  ?:help  q:quit".to_string()
    };

    let paragraph = Paragraph::new(content).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Bottom line in command mode: prompt, typed text, and cursor
fn draw_command_input(frame: &mut Frame, app: &App, area: Rect) {
    let prefix = ":";
    let input = &app.command_input;

    let line = Line::from(vec![
        Span::styled(prefix, Style::default().fg(Color::Yellow)),
        Span::raw(input.as_str()),
    ]);

    let paragraph = Paragraph::new(line);
    frame.render_widget(paragraph, area);

    // Terminal cursor tracks the edit point
    let cursor_x = area.x + prefix.len() as u16 + app.command_cursor as u16;
    frame.set_cursor_position((cursor_x, area.y));
}

/// Bottom line in move mode: the hover key hints
fn draw_move_bar(frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            "MOVE ",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" j/k: reposition  h/l: switch group  Enter: drop  Esc: cancel"),
    ]);

    let paragraph = Paragraph::new(line);
    frame.render_widget(paragraph, area);
}

/// Draw fetch indicator in top-right corner
fn draw_fetch_indicator(frame: &mut Frame, app: &App) {
    let area = frame.area();
    if area.width < 5 {
        return;
    }

    let (icon, style) = if !app.fetch_enabled {
        ("○", Style::default().add_modifier(Modifier::DIM))
    } else if app.fetching > 0 {
        ("↻", Style::default().fg(Color::Yellow))
    } else {
        ("✓", Style::default().fg(Color::Green))
    };

    let indicator = Paragraph::new(Span::styled(icon, style));
    let indicator_area = Rect::new(area.width - 2, 0, 1, 1);
    frame.render_widget(indicator, indicator_area);
}

/// Help popup listing the key map
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Center the popup
    let popup_width = 50.min(area.width.saturating_sub(4));
    let popup_height = 24.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Blank the cells underneath
    frame.render_widget(ratatui::widgets::Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from("Navigation:"),
        Line::from("  j/k, ↑/↓    Move up/down"),
        Line::from("  gg / G      Jump to first/last row"),
        Line::from("  Ctrl-d/u    Page down/up"),
        Line::from("  h/l, Tab    Switch panes"),
        Line::from("  Enter       Open bookmark / Focus group"),
        Line::from(""),
        Line::from("Commands:"),
        Line::from("  a / A       Add bookmark / group"),
        Line::from("  t / U       Edit title / URL"),
        Line::from("  r           Rename group"),
        Line::from("  m           Move bookmark"),
        Line::from("  J/K         Reorder groups"),
        Line::from("  d           Delete (dd deletes a group)"),
        Line::from("  u           Undo delete"),
        Line::from(""),
        Line::from("  :           Command mode"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().add_modifier(Modifier::BOLD));

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, popup_area);
}

/// Clip to max bytes, ending with an ellipsis
fn clip(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    // The cut must land on a char boundary
    let mut cut = max.saturating_sub(1);
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…", &s[..cut])
}

/// Error popup; any key dismisses it
fn draw_error_overlay(frame: &mut Frame, message: &str) {
    let area = frame.area();

    // Center the popup
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 7.min(area.height.saturating_sub(4));
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Blank the cells underneath
    frame.render_widget(ratatui::widgets::Clear, popup_area);

    let text = vec![
        Line::from(""),
        Line::from(message),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to dismiss",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}
