//! Opening URLs in the default browser

use std::process::{Command, Stdio};

/// The platform launcher: xdg-open on Linux, open on macOS, start on Windows
fn launcher() -> Command {
    if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]);
        cmd
    } else {
        Command::new("xdg-open")
    }
}

/// Hand a URL to the default browser
///
/// The launcher runs detached with null stdio; the terminal keeps the
/// foreground either way.
pub fn open_url(url: &str) -> std::io::Result<()> {
    launcher()
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}
