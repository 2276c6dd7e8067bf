//! Bookmark command handlers

use anyhow::{bail, Context, Result};

use linkdeck_core::{Bookmark, Store, DEFAULT_GROUP_ID};

use super::group::resolve_group_id;
use crate::browser;
use crate::favicon::{self, PageInfo};
use crate::output::Output;
use crate::prompt;

/// Create a new bookmark
pub async fn create(
    store: &mut Store,
    url: String,
    title: Option<String>,
    group: Option<String>,
    output: &Output,
) -> Result<()> {
    let group_id = match group {
        Some(ref g) => resolve_group_id(g, store)?,
        None => DEFAULT_GROUP_ID.to_string(),
    };

    // Fetch the favicon, and a fallback title when none was given
    let info = if store.config().fetch_favicons {
        favicon::fetch_page_info(&url).await
    } else {
        PageInfo::default()
    };

    let title = title.or(info.title).unwrap_or_else(|| url.clone());

    let mut bookmark = Bookmark::new(title, url);
    bookmark.set_favicon(info.favicon);

    let id = store
        .add_bookmark(bookmark, &group_id)
        .context("Failed to create bookmark")?;

    output.success(&format!("Created bookmark: {}", id));
    if let Ok(stored) = store.deck().get_bookmark(&id) {
        output.print_bookmark(stored);
    }

    Ok(())
}

/// List bookmarks, optionally filtered to one group
pub fn list(store: &Store, group: Option<String>, output: &Output) -> Result<()> {
    let bookmarks: Vec<Bookmark> = match group {
        Some(ref g) => {
            let group_id = resolve_group_id(g, store)?;
            store
                .deck()
                .group(&group_id)
                .map(|grp| grp.bookmarks.clone())
                .unwrap_or_default()
        }
        None => store.deck().bookmarks().cloned().collect(),
    };

    output.print_bookmarks(&bookmarks);
    Ok(())
}

/// Show a single bookmark
pub fn show(store: &Store, id: String, output: &Output) -> Result<()> {
    let bookmark_id = parse_bookmark_id(&id, store)?;
    let bookmark = store.deck().get_bookmark(&bookmark_id)?;

    output.print_bookmark(bookmark);
    Ok(())
}

/// Edit a bookmark
pub async fn edit(
    store: &mut Store,
    id: String,
    title: Option<String>,
    url: Option<String>,
    group: Option<String>,
    output: &Output,
) -> Result<()> {
    let bookmark_id = parse_bookmark_id(&id, store)?;
    let mut bookmark = store.deck().get_bookmark(&bookmark_id)?.clone();
    let previous_url = bookmark.url.clone();

    // Editing into a different group appends there; otherwise the
    // bookmark keeps its position
    let target_group_id = match group {
        Some(ref g) => resolve_group_id(g, store)?,
        None => bookmark.group_id.clone(),
    };

    if title.is_none() && url.is_none() && group.is_none() {
        // Interactive editing
        println!("Editing bookmark: {}", bookmark.id);
        println!("Press Enter to keep current value, or type new value.\n");

        if let Some(new_title) = prompt::with_default("Title", &bookmark.title)? {
            bookmark.set_title(new_title);
        }
        if let Some(new_url) = prompt::with_default("URL", &bookmark.url)? {
            bookmark.set_url(new_url);
        }
    } else {
        if let Some(new_title) = title {
            bookmark.set_title(new_title);
        }
        if let Some(new_url) = url {
            bookmark.set_url(new_url);
        }
    }

    // A changed URL invalidates the stored favicon
    if bookmark.url != previous_url && store.config().fetch_favicons {
        let info = favicon::fetch_page_info(&bookmark.url).await;
        bookmark.set_favicon(info.favicon);
    }

    store
        .edit_bookmark(bookmark, &target_group_id)
        .context("Failed to update bookmark")?;

    output.success("Bookmark updated");
    if let Ok(updated) = store.deck().get_bookmark(&bookmark_id) {
        output.print_bookmark(updated);
    }

    Ok(())
}

/// Move a bookmark within its group or into another group
pub fn mv(
    store: &mut Store,
    id: String,
    group: Option<String>,
    position: Option<usize>,
    output: &Output,
) -> Result<()> {
    let bookmark_id = parse_bookmark_id(&id, store)?;

    let from_group_id = store
        .deck()
        .owning_group(&bookmark_id)
        .map(|g| g.id.clone())
        .ok_or_else(|| anyhow::anyhow!("Bookmark not found: {}", id))?;

    match (group, position) {
        (Some(ref g), to_index) => {
            let to_group_id = resolve_group_id(g, store)?;
            if to_group_id == from_group_id {
                match to_index {
                    Some(to) => {
                        reorder_in_place(store, &bookmark_id, &from_group_id, to)?;
                        output.success(&format!(
                            "Moved bookmark {} to position {}",
                            bookmark_id, to
                        ));
                    }
                    None => output.message("Bookmark is already in that group."),
                }
            } else {
                store
                    .move_bookmark_between_groups(
                        &bookmark_id,
                        &from_group_id,
                        &to_group_id,
                        to_index,
                    )
                    .context("Failed to move bookmark")?;
                output.success(&format!(
                    "Moved bookmark {} to group {}",
                    bookmark_id, to_group_id
                ));
            }
        }
        (None, Some(to)) => {
            reorder_in_place(store, &bookmark_id, &from_group_id, to)?;
            output.success(&format!("Moved bookmark {} to position {}", bookmark_id, to));
        }
        (None, None) => bail!("Nothing to do. Pass --group and/or --position."),
    }

    Ok(())
}

/// Open a bookmark in the default browser
pub fn open(store: &Store, id: String, output: &Output) -> Result<()> {
    let bookmark_id = parse_bookmark_id(&id, store)?;
    let bookmark = store.deck().get_bookmark(&bookmark_id)?;

    browser::open_url(&bookmark.url)
        .with_context(|| format!("Failed to open {}", bookmark.url))?;

    output.success(&format!("Opened '{}'", bookmark.title));
    Ok(())
}

/// Delete a bookmark
pub fn delete(store: &mut Store, id: String, output: &Output) -> Result<()> {
    let bookmark_id = parse_bookmark_id(&id, store)?;
    let bookmark = store.deck().get_bookmark(&bookmark_id)?.clone();

    // Confirm deletion
    if output.should_prompt() {
        println!("Delete bookmark: {} - {}", bookmark.id, bookmark.title);
        if !prompt::confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store
        .delete_bookmark(&bookmark_id, &bookmark.group_id)
        .context("Failed to delete bookmark")?;

    output.success(&format!("Deleted bookmark: {}", bookmark_id));

    Ok(())
}

/// Reorder a bookmark inside the group it already lives in
fn reorder_in_place(store: &mut Store, bookmark_id: &str, group_id: &str, to: usize) -> Result<()> {
    let from = store
        .deck()
        .group(group_id)
        .and_then(|g| g.position_of(bookmark_id))
        .ok_or_else(|| anyhow::anyhow!("Bookmark not found: {}", bookmark_id))?;

    store
        .reorder_within_group(group_id, from, to)
        .context("Failed to move bookmark")?;

    Ok(())
}

/// Parse a bookmark ID (supports full ID or prefix)
fn parse_bookmark_id(id: &str, store: &Store) -> Result<String> {
    // Exact match first
    if store.deck().find_bookmark(id).is_some() {
        return Ok(id.to_string());
    }

    let matches: Vec<&Bookmark> = store
        .deck()
        .bookmarks()
        .filter(|b| b.id.starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No bookmark found matching: {}", id),
        1 => Ok(matches[0].id.clone()),
        _ => {
            eprintln!("Multiple bookmarks match '{}':", id);
            for bookmark in &matches {
                eprintln!("  {} - {}", bookmark.id, bookmark.title);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}
