//! Command output in three flavors: human-readable text (the default),
//! JSON via --json, and id-only quiet mode via --quiet for scripting.

use chrono::DateTime;
use linkdeck_core::{Bookmark, Group};

/// How command results get printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text for people
    Human,
    /// Machine-readable JSON (--json)
    Json,
    /// Bare ids for scripting (--quiet)
    Quiet,
}

impl OutputFormat {
    /// Quiet wins when both flags are given
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Formatting front end shared by every command
pub struct Output {
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single bookmark
    pub fn print_bookmark(&self, bookmark: &Bookmark) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:      {}", bookmark.id);
                println!("Title:   {}", bookmark.title);
                println!("URL:     {}", bookmark.url);
                println!("Group:   {}", bookmark.group_id);
                println!("Favicon: {}", bookmark.favicon);
                println!("Edited:  {}", format_edited(bookmark.edited_time));
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(bookmark).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", bookmark.id);
            }
        }
    }

    /// Print a list of bookmarks
    pub fn print_bookmarks(&self, bookmarks: &[Bookmark]) {
        match self.format {
            OutputFormat::Human => {
                if bookmarks.is_empty() {
                    println!("No bookmarks found.");
                    return;
                }
                for bookmark in bookmarks {
                    println!(
                        "{} | {} | {}",
                        short_id(&bookmark.id),
                        truncate(&bookmark.title, 35),
                        truncate(&bookmark.url, 45)
                    );
                }
                println!("\n{} bookmark(s)", bookmarks.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(bookmarks).unwrap());
            }
            OutputFormat::Quiet => {
                for bookmark in bookmarks {
                    println!("{}", bookmark.id);
                }
            }
        }
    }

    /// Print a single group with its bookmarks
    pub fn print_group(&self, group: &Group) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:    {}", group.id);
                println!("Title: {}", group.title);

                println!();
                if group.bookmarks.is_empty() {
                    println!("── No bookmarks ──");
                } else {
                    println!("── Bookmarks ({}) ──", group.bookmarks.len());
                    for bookmark in &group.bookmarks {
                        println!(
                            "{} | {} | {}",
                            short_id(&bookmark.id),
                            truncate(&bookmark.title, 35),
                            truncate(&bookmark.url, 45)
                        );
                    }
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(group).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", group.id);
            }
        }
    }

    /// Print a list of groups
    pub fn print_groups(&self, groups: &[Group]) {
        match self.format {
            OutputFormat::Human => {
                if groups.is_empty() {
                    println!("No groups found.");
                    return;
                }
                for group in groups {
                    println!(
                        "{} | {} | {} bookmark(s)",
                        group.id,
                        truncate(&group.title, 35),
                        group.bookmarks.len()
                    );
                }
                println!("\n{} group(s)", groups.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(groups).unwrap());
            }
            OutputFormat::Quiet => {
                for group in groups {
                    println!("{}", group.id);
                }
            }
        }
    }

    /// Success line, silent in quiet mode
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Confirmation prompts only make sense for a human reader
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Plain informational line
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Shorten an ID for list display
fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Clip to max_len bytes with a trailing "..."
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    // The cut must land on a char boundary
    let mut cut = max_len.saturating_sub(3);
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &s[..cut])
}

/// Format an edited-time timestamp (milliseconds since epoch)
fn format_edited(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Both flags set: quiet wins
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("wiki", 10), "wiki");
        assert_eq!(truncate("a rather long bookmark title", 10), "a rathe...");
    }

    #[test]
    fn test_truncate_multibyte() {
        // The cut backs up rather than splitting the é
        assert_eq!(truncate("cafés and more", 7), "caf...");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("default"), "default");
        assert_eq!(short_id("c19b9862-1b3f-4a0f-9e0c-2b8870aa1595"), "c19b9862");
    }

    #[test]
    fn test_format_edited() {
        assert_eq!(format_edited(0), "1970-01-01 00:00");
        assert_eq!(format_edited(1_700_000_000_000), "2023-11-14 22:13");
    }
}
