use clap::{Parser, Subcommand};
use linkjarapp::init::DATA_ENV;
use linkjarapp::model::{Category, EntryKind, PriorityState};
use linkjarapp::view::{SortMode, StatusFilter};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lj", bin_name = "lj", version, disable_help_subcommand = true)]
#[command(about = "Keep the links, snippets and images you paste", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (defaults to the OS data directory)
    #[arg(long, global = true, env = DATA_ENV, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add typed text or a URL (use `-` to read stdin)
    #[command(alias = "a", display_order = 1)]
    Add {
        /// Words to add, joined with spaces
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Add whatever is on the system clipboard
    #[command(alias = "p", display_order = 2)]
    Paste,

    /// Add a file: images by extension, anything else as text
    #[command(display_order = 3)]
    Drop { path: PathBuf },

    /// List entries grouped by day
    #[command(alias = "ls", display_order = 4)]
    List {
        /// Only entries with this status (all, none, pending, done, remaining)
        #[arg(long, short = 's')]
        status: Option<StatusFilter>,

        /// Only links whose host contains this text
        #[arg(long, short = 'd')]
        domain: Option<String>,

        /// Only entries in this category
        #[arg(long, short = 'c')]
        category: Option<Category>,

        /// Only entries of this kind (url, text, image)
        #[arg(long, short = 'k')]
        kind: Option<EntryKind>,

        /// Sort order (newest, oldest, priority)
        #[arg(long, default_value = "newest")]
        sort: SortMode,

        /// Print the groups as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete entries (undoable for a few seconds)
    #[command(alias = "rm", display_order = 10)]
    Delete {
        /// Selectors (e.g. 1 3-5 #1729242000000)
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Delete every entry (undoable for a few seconds)
    #[command(display_order = 11)]
    Clear,

    /// Restore the last deleted or cleared entries
    #[command(alias = "u", display_order = 12)]
    Undo,

    /// Cycle priority (none, pending, done, remaining) or set it
    #[command(alias = "pri", display_order = 13)]
    Priority {
        /// Selectors (e.g. 1 3-5)
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,

        /// Set this state instead of cycling
        #[arg(long)]
        set: Option<PriorityState>,
    },

    /// Set the category of entries, or `none` to clear it
    #[command(alias = "cat", display_order = 14)]
    Category {
        /// Selectors (e.g. 1 3-5)
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,

        /// reels, useful, work, shopping, reading, other, or none
        #[arg(required = true)]
        category: String,
    },

    /// Show or replace the notes of an entry
    #[command(display_order = 15)]
    Notes {
        /// Selector (e.g. 1)
        selector: String,

        /// New notes; omit to show the current ones
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },

    /// Open links in the browser
    #[command(alias = "o", display_order = 16)]
    Open {
        /// Selectors (e.g. 1 3-5)
        #[arg(required = true, num_args = 1..)]
        selectors: Vec<String>,
    },

    /// Show the effective configuration
    #[command(display_order = 30)]
    Config {
        /// Print a commented linkjar.toml instead
        #[arg(long)]
        template: bool,
    },
}

/// `none` clears the category.
pub fn parse_category_arg(s: &str) -> Result<Option<Category>, String> {
    if s.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    s.parse().map(Some)
}
