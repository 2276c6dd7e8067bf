//! Linkdeck CLI
//!
//! Command-line interface for linkdeck - grouped bookmark management.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use linkdeck_core::{Config, Store};

mod browser;
mod commands;
mod favicon;
mod output;
mod prompt;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "linkdeck")]
#[command(about = "Linkdeck - Grouped bookmark management")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a specific config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// Manage bookmarks
    Bookmark {
        #[command(subcommand)]
        command: BookmarkCommands,
    },
    /// Manage groups
    Group {
        #[command(subcommand)]
        command: GroupCommands,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show status (storage location, counts)
    Status,
}

#[derive(Subcommand)]
enum BookmarkCommands {
    /// Create a new bookmark
    #[command(alias = "add")]
    Create {
        /// URL to save
        url: String,
        /// Bookmark title (fetched from the page if omitted)
        #[arg(short, long)]
        title: Option<String>,
        /// Group to add to (default group if omitted)
        #[arg(short, long)]
        group: Option<String>,
    },
    /// List bookmarks
    #[command(alias = "ls")]
    List {
        /// Filter by group
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Show bookmark details
    Show {
        /// Bookmark ID (full or prefix)
        id: String,
    },
    /// Edit a bookmark (interactive without flags)
    Edit {
        /// Bookmark ID (full or prefix)
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New URL
        #[arg(short, long)]
        url: Option<String>,
        /// New group (moves the bookmark to the end of that group)
        #[arg(short, long)]
        group: Option<String>,
    },
    /// Move a bookmark within or between groups
    #[command(alias = "mv")]
    Move {
        /// Bookmark ID (full or prefix)
        id: String,
        /// Destination group
        #[arg(short, long)]
        group: Option<String>,
        /// Destination position (0-based; end of group if omitted)
        #[arg(short, long)]
        position: Option<usize>,
    },
    /// Open a bookmark in the default browser
    Open {
        /// Bookmark ID (full or prefix)
        id: String,
    },
    /// Delete a bookmark
    #[command(alias = "rm")]
    Delete {
        /// Bookmark ID (full or prefix)
        id: String,
    },
}

#[derive(Subcommand)]
enum GroupCommands {
    /// Create a new group
    #[command(alias = "add")]
    Create {
        /// Group title
        title: String,
    },
    /// List all groups
    #[command(alias = "ls")]
    List,
    /// Show a group and its bookmarks
    Show {
        /// Group ID (full or prefix)
        id: String,
    },
    /// Rename a group
    Rename {
        /// Group ID (full or prefix)
        id: String,
        /// New title
        title: String,
    },
    /// Move a group to a new position
    #[command(alias = "mv")]
    Move {
        /// Group ID (full or prefix)
        id: String,
        /// Target position (0-based)
        position: usize,
    },
    /// Delete a group and its bookmarks
    #[command(alias = "rm")]
    Delete {
        /// Group ID (full or prefix)
        id: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, fetch_favicons, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config doesn't need the store
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    // Handle TUI (default when no command given)
    if matches!(&cli.command, Some(Commands::Tui) | None) {
        return tui::run(cli.config.as_ref()).await;
    }

    // Open store for commands that need it
    let config = Config::load_with_cli_override(cli.config.as_ref())?;
    let mut store = Store::open_with_config(config)?;

    match cli.command.unwrap() {
        Commands::Tui => unreachable!(),           // Handled above
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Bookmark { command } => {
            handle_bookmark_command(command, &mut store, &output).await
        }
        Commands::Group { command } => handle_group_command(command, &mut store, &output),
        Commands::Status => commands::status::show(&store, &output),
    }
}

async fn handle_bookmark_command(
    command: BookmarkCommands,
    store: &mut Store,
    output: &Output,
) -> Result<()> {
    match command {
        BookmarkCommands::Create { url, title, group } => {
            commands::bookmark::create(store, url, title, group, output).await
        }
        BookmarkCommands::List { group } => commands::bookmark::list(store, group, output),
        BookmarkCommands::Show { id } => commands::bookmark::show(store, id, output),
        BookmarkCommands::Edit {
            id,
            title,
            url,
            group,
        } => commands::bookmark::edit(store, id, title, url, group, output).await,
        BookmarkCommands::Move {
            id,
            group,
            position,
        } => commands::bookmark::mv(store, id, group, position, output),
        BookmarkCommands::Open { id } => commands::bookmark::open(store, id, output),
        BookmarkCommands::Delete { id } => commands::bookmark::delete(store, id, output),
    }
}

fn handle_group_command(
    command: GroupCommands,
    store: &mut Store,
    output: &Output,
) -> Result<()> {
    match command {
        GroupCommands::Create { title } => commands::group::create(store, title, output),
        GroupCommands::List => commands::group::list(store, output),
        GroupCommands::Show { id } => commands::group::show(store, id, output),
        GroupCommands::Rename { id, title } => commands::group::rename(store, id, title, output),
        GroupCommands::Move { id, position } => {
            commands::group::reorder(store, id, position, output)
        }
        GroupCommands::Delete { id } => commands::group::delete(store, id, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
