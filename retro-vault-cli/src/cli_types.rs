//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use retro_vault_catalog::SearchScope;

#[derive(Parser)]
#[command(name = "retro-vault")]
#[command(about = "Manage a retro game catalog and its cloud archive paths", long_about = None)]
pub(crate) struct Cli {
    /// Catalog database path (overrides RETRO_VAULT_DB and settings.toml)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Root prefix for archived game paths (overrides RETRO_VAULT_CLOUD_ROOT)
    #[arg(long, global = true)]
    pub cloud_root: Option<String>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Shared `--all` switch for listings.
#[derive(Args, Clone, Copy)]
pub(crate) struct VisibilityArgs {
    /// Include entries that have no archived file yet
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create or upgrade the catalog and merge the secondary store into it
    Init,

    /// Merge another catalog store into this one (existing rows always win)
    Merge {
        /// Path to the store to merge from
        path: PathBuf,
    },

    /// Show catalog statistics
    Stats,

    /// List companies
    Companies {
        #[command(flatten)]
        visibility: VisibilityArgs,
    },

    /// List consoles, optionally for a single company
    Consoles {
        /// Company ID
        #[arg(short, long)]
        company: Option<i64>,

        #[command(flatten)]
        visibility: VisibilityArgs,
    },

    /// List the games on a console
    Games {
        /// Console ID
        console: i64,

        #[command(flatten)]
        visibility: VisibilityArgs,
    },

    /// Search companies, consoles, and games by name
    Search {
        /// Text to look for (case-insensitive)
        term: String,

        /// What to search: companies, consoles, games, or all
        #[arg(short, long, default_value = "all")]
        scope: SearchScope,

        #[command(flatten)]
        visibility: VisibilityArgs,
    },

    /// Record the archive path for a game on a console
    Register {
        /// Game ID
        game: i64,

        /// Console ID
        console: i64,
    },

    /// Show which manufacturer a platform name maps to
    Classify {
        /// Platform names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Add an upstream platform, filing it under its manufacturer
    AddPlatform {
        /// Upstream platform ID
        id: i64,

        /// Platform name
        name: String,

        /// Number of games the upstream catalog lists for this platform
        #[arg(long)]
        catalog_count: Option<i64>,
    },

    /// Add an upstream game and link it to a console
    AddGame {
        /// Upstream game ID
        id: i64,

        /// Game title
        name: String,

        /// Console IDs to link the game to
        #[arg(short, long = "console", required = true, value_delimiter = ',')]
        consoles: Vec<i64>,

        /// Release date as reported upstream
        #[arg(long)]
        release_date: Option<String>,

        /// Description text
        #[arg(long)]
        description: Option<String>,

        /// Publisher names
        #[arg(long, value_delimiter = ',')]
        publishers: Vec<String>,
    },

    /// List roles
    Roles,

    /// Add a role
    AddRole {
        /// Role name
        name: String,
    },

    /// List the users holding a role
    Users {
        /// Role name (case-insensitive)
        role: String,
    },

    /// Create a user
    AddUser {
        /// User name
        name: String,

        /// Role name (case-insensitive)
        #[arg(short, long)]
        role: String,

        /// Password (prompted for if omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Check a user's credentials
    Login {
        /// User name
        name: String,

        /// Password (prompted for if omitted)
        #[arg(long)]
        password: Option<String>,
    },
}
