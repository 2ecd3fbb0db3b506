//! # Lexicon CLI Module
//!
//! This module implements the CLI interface for Lexicon.
//!
//! ## Available Commands
//!
//! - `init` - Create an empty snapshot
//! - `status` - Show entity and edge counts
//! - `check` - Run the integrity audit and list orphans
//! - `add-language`, `add-entry`, `add-keyword`, `add-note`, `add-usage`,
//!   `add-collection` - Create entities
//! - `link` / `unlink` - Connect or disconnect two entities by edge kind
//! - `move` - Reorder one of an entry's ordered fields
//! - `delete` - Cascading delete
//! - `merge` - Fold one entry, language or keyword into another
//! - `list` - Whole-kind scan with sort, filter and limit
//! - `show` - Print an entity with its neighbours
//! - `export` / `import` - JSON dump and restore
//!
//! Entities are addressed as `kind:id`, e.g. `entry:12` or `language:3`.
//! Languages may also be given by code.

mod commands;

use crate::config::{LexiconConfig, Settings};
use clap::{Parser, Subcommand};
use lexicon_core::LexiconError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Lexicon - personal multilingual dictionary
///
/// Entries, translations, usage examples, notes, keywords and collections,
/// stored in a single snapshot file.
#[derive(Parser, Debug)]
#[command(name = "lexicon")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the snapshot file (overrides the config file)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Path to a TOML config file (default: ./lexicon.toml if present)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new empty snapshot
    Init {
        /// Overwrite an existing snapshot
        #[arg(short, long)]
        force: bool,
    },

    /// Show entity and edge counts
    Status,

    /// Audit referential integrity and list orphaned entities
    Check {
        /// Audit a JSON export instead of the snapshot
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Add a language
    AddLanguage {
        /// Short code, e.g. "en"
        code: String,

        /// Display title, e.g. "English"
        #[arg(short, long, default_value = "")]
        title: String,
    },

    /// Add an entry
    AddEntry {
        spelling: String,

        #[arg(short, long, default_value = "")]
        pronunciation: String,

        #[arg(short, long, default_value = "")]
        definition: String,

        /// Language code or reference; repeat for several, in order
        #[arg(short, long = "language")]
        languages: Vec<String>,
    },

    /// Add a keyword, optionally matching entries
    AddKeyword {
        title: String,

        /// Entry to match; repeatable
        #[arg(short, long = "entry")]
        entries: Vec<String>,
    },

    /// Add a note to an entry or a usage
    AddNote {
        text: String,

        /// Owning entry
        #[arg(short, long, conflicts_with = "usage")]
        entry: Option<String>,

        /// Owning usage
        #[arg(short, long)]
        usage: Option<String>,
    },

    /// Add a usage example
    AddUsage {
        text: String,

        /// Entry the example illustrates; repeatable
        #[arg(short, long = "entry")]
        entries: Vec<String>,

        /// Language code or reference; repeatable
        #[arg(short, long = "language")]
        languages: Vec<String>,
    },

    /// Add an entry collection
    AddCollection {
        title: String,

        /// Entry to append; repeatable
        #[arg(short, long = "entry")]
        entries: Vec<String>,
    },

    /// Connect two entities (e.g. `link translation entry:1 entry:2`)
    Link {
        /// Edge kind (entry_language, translation, root, see_also,
        /// entry_usage, entry_keyword, entry_note, entry_collection,
        /// usage_language, usage_note)
        edge: String,
        from: String,
        to: String,

        /// Record a translation in one direction only
        #[arg(long)]
        one_way: bool,
    },

    /// Disconnect two entities; reports entities pruned as orphans
    Unlink {
        edge: String,
        from: String,
        to: String,

        /// Remove a translation in one direction only
        #[arg(long)]
        one_way: bool,
    },

    /// Move positions of an entry's ordered field to an offset
    Move {
        entry: String,

        /// languages, translations, roots, see_also, usages or notes
        list: String,

        /// Source positions (comma-separated)
        #[arg(short, long, value_delimiter = ',', required = true)]
        from: Vec<usize>,

        /// Destination offset in the current list
        #[arg(short, long)]
        to: usize,
    },

    /// Delete an entity and every edge touching it
    Delete { reference: String },

    /// Merge `incoming` into `existing`; `incoming` stops existing
    Merge { incoming: String, existing: String },

    /// List all entities of a kind
    List {
        /// entries, languages, keywords, notes, usages or collections
        kind: String,

        /// Sort key: created, modified or text
        #[arg(short, long)]
        sort: Option<String>,

        /// Reverse the order
        #[arg(short, long)]
        reverse: bool,

        /// Maximum number of rows
        #[arg(short, long)]
        limit: Option<usize>,

        /// Keep rows whose text contains this (case-insensitive)
        #[arg(short, long)]
        contains: Option<String>,
    },

    /// Show an entity with its neighbours
    Show { reference: String },

    /// Export the lexicon as JSON
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Replace the snapshot with a JSON export
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Overwrite a non-empty snapshot
        #[arg(short, long)]
        force: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), LexiconError> {
    let config = LexiconConfig::discover(cli.config.as_deref())?;
    let settings = Settings::resolve(&config, cli.database, cli.json_mode)?;
    let quiet = cli.quiet;

    if cli.verbose {
        tracing::info!("Using snapshot {}", settings.database.display());
    }

    match cli.command {
        Some(Commands::Init { force }) => cmd_init(&settings, force),
        Some(Commands::Status) | None => cmd_status(&settings),
        Some(Commands::Check { input }) => cmd_check(&settings, input.as_deref()),
        Some(Commands::AddLanguage { code, title }) => {
            cmd_add_language(&settings, quiet, &code, &title)
        }
        Some(Commands::AddEntry {
            spelling,
            pronunciation,
            definition,
            languages,
        }) => cmd_add_entry(
            &settings,
            quiet,
            &spelling,
            &pronunciation,
            &definition,
            &languages,
        ),
        Some(Commands::AddKeyword { title, entries }) => {
            cmd_add_keyword(&settings, quiet, &title, &entries)
        }
        Some(Commands::AddNote { text, entry, usage }) => cmd_add_note(
            &settings,
            quiet,
            &text,
            entry.as_deref(),
            usage.as_deref(),
        ),
        Some(Commands::AddUsage {
            text,
            entries,
            languages,
        }) => cmd_add_usage(&settings, quiet, &text, &entries, &languages),
        Some(Commands::AddCollection { title, entries }) => {
            cmd_add_collection(&settings, quiet, &title, &entries)
        }
        Some(Commands::Link {
            edge,
            from,
            to,
            one_way,
        }) => cmd_link(&settings, quiet, &edge, &from, &to, !one_way),
        Some(Commands::Unlink {
            edge,
            from,
            to,
            one_way,
        }) => cmd_unlink(&settings, &edge, &from, &to, !one_way),
        Some(Commands::Move {
            entry,
            list,
            from,
            to,
        }) => cmd_move(&settings, quiet, &entry, &list, &from, to),
        Some(Commands::Delete { reference }) => cmd_delete(&settings, quiet, &reference),
        Some(Commands::Merge { incoming, existing }) => {
            cmd_merge(&settings, quiet, &incoming, &existing)
        }
        Some(Commands::List {
            kind,
            sort,
            reverse,
            limit,
            contains,
        }) => cmd_list(
            &settings,
            &kind,
            &ListOptions {
                sort,
                reverse,
                limit,
                contains,
            },
        ),
        Some(Commands::Show { reference }) => cmd_show(&settings, &reference),
        Some(Commands::Export { output }) => cmd_export(&settings, &output),
        Some(Commands::Import { input, force }) => cmd_import(&settings, &input, force),
    }
}
