//! Status command handler

use anyhow::Result;

use linkdeck_core::Store;

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(store: &Store, output: &Output) -> Result<()> {
    let config = store.config();
    let snapshot_path = config.bookmarks_path();
    let snapshot_size = std::fs::metadata(&snapshot_path).map(|m| m.len()).unwrap_or(0);

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "snapshot": {
                        "path": snapshot_path,
                        "exists": snapshot_path.exists(),
                        "size": snapshot_size
                    },
                    "fetch_favicons": config.fetch_favicons,
                    "counts": {
                        "groups": store.deck().group_count(),
                        "bookmarks": store.deck().bookmark_count()
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", store.deck().bookmark_count());
        }
        OutputFormat::Human => {
            println!("Linkdeck Status");
            println!("===============");
            println!();
            println!("Storage:");
            println!("  Location: {}", config.data_dir.display());
            println!("  Snapshot: {}", snapshot_path.display());
            println!("  Size:     {}", human_size(snapshot_size));
            println!();
            println!("Favicons:");
            println!(
                "  Fetching: {}",
                if config.fetch_favicons {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            println!();
            println!("Contents:");
            println!("  Groups:    {}", store.deck().group_count());
            println!("  Bookmarks: {}", store.deck().bookmark_count());
        }
    }

    Ok(())
}

/// Format a byte count for display
fn human_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
