//! Group command handlers

use anyhow::{bail, Context, Result};

use linkdeck_core::{Group, Store};

use crate::output::Output;
use crate::prompt;

/// Create a new group
pub fn create(store: &mut Store, title: String, output: &Output) -> Result<()> {
    let id = store.add_group(title).context("Failed to create group")?;

    output.success(&format!("Created group: {}", id));
    if let Some(group) = store.deck().group(&id) {
        output.print_group(group);
    }

    Ok(())
}

/// List all groups
pub fn list(store: &Store, output: &Output) -> Result<()> {
    output.print_groups(store.groups());
    Ok(())
}

/// Show a group and its bookmarks
pub fn show(store: &Store, id: String, output: &Output) -> Result<()> {
    let group_id = resolve_group_id(&id, store)?;

    let group = store
        .deck()
        .group(&group_id)
        .ok_or_else(|| anyhow::anyhow!("Group not found: {}", id))?;

    output.print_group(group);
    Ok(())
}

/// Rename a group
pub fn rename(store: &mut Store, id: String, title: String, output: &Output) -> Result<()> {
    let group_id = resolve_group_id(&id, store)?;

    store
        .edit_group_title(&group_id, title)
        .context("Failed to rename group")?;

    output.success(&format!("Renamed group: {}", group_id));
    if let Some(group) = store.deck().group(&group_id) {
        output.print_group(group);
    }

    Ok(())
}

/// Move a group to a new position in the deck
pub fn reorder(store: &mut Store, id: String, position: usize, output: &Output) -> Result<()> {
    let group_id = resolve_group_id(&id, store)?;

    let from = store
        .groups()
        .iter()
        .position(|g| g.id == group_id)
        .ok_or_else(|| anyhow::anyhow!("Group not found: {}", id))?;

    let moved = store
        .reorder_groups(from, position)
        .context("Failed to move group")?;

    if moved {
        output.success(&format!("Moved group {} to position {}", group_id, position));
    } else {
        output.message("Group is already at that position.");
    }

    Ok(())
}

/// Delete a group and all of its bookmarks
pub fn delete(store: &mut Store, id: String, output: &Output) -> Result<()> {
    let group_id = resolve_group_id(&id, store)?;

    let (title, count) = store
        .deck()
        .group(&group_id)
        .map(|g| (g.title.clone(), g.bookmarks.len()))
        .ok_or_else(|| anyhow::anyhow!("Group not found: {}", id))?;

    // Confirm deletion
    if output.should_prompt() {
        println!("Delete group: {} - {} ({} bookmarks)", group_id, title, count);
        if !prompt::confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store
        .delete_group(&group_id)
        .context("Failed to delete group")?;

    output.success(&format!("Deleted group: {}", group_id));

    Ok(())
}

/// Resolve a group ID (supports exact match or prefix)
pub(crate) fn resolve_group_id(id: &str, store: &Store) -> Result<String> {
    // Exact match first; group ids are short and human-typed
    if store.deck().group(id).is_some() {
        return Ok(id.to_string());
    }

    let matches: Vec<&Group> = store
        .groups()
        .iter()
        .filter(|g| g.id.starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No group found matching: {}", id),
        1 => Ok(matches[0].id.clone()),
        _ => {
            eprintln!("Multiple groups match '{}':", id);
            for group in &matches {
                eprintln!("  {} - {}", group.id, group.title);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}
