//! Interactive prompts
//!
//! Stdin helpers for destructive-action confirmations and inline edits.

use std::io::{self, Write};

use anyhow::Result;

/// Ask a yes/no question, defaulting to no
///
/// Anything but an explicit yes declines. Without a TTY on stdin there is
/// nobody to ask, so the answer is no.
pub fn confirm(question: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let answer = read_trimmed()?.to_lowercase();
    Ok(matches!(answer.as_str(), "y" | "yes"))
}

/// Ask for a new value, showing the current one
///
/// An empty answer keeps the current value (`None`).
pub fn with_default(label: &str, current: &str) -> Result<Option<String>> {
    if current.is_empty() {
        print!("{}: ", label);
    } else {
        print!("{} [{}]: ", label, current);
    }
    io::stdout().flush()?;

    let answer = read_trimmed()?;
    if answer.is_empty() {
        Ok(None)
    } else {
        Ok(Some(answer))
    }
}

fn read_trimmed() -> Result<String> {
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
