//! CLI command definitions and dispatch for the `bman` binary.
//!
//! Uses clap derive macros for argument parsing. Every command that takes a
//! `<build>` argument accepts either a build id or its exact name.

pub mod apply;
pub mod build;
pub mod catalog;
pub mod live;
pub mod transfer;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Manage and apply HWM character builds.
#[derive(Parser)]
#[command(name = "bman", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Raw `Cookie` header of a logged-in game session.
    #[arg(long, global = true, env = "BUILDMAN_SESSION", hide_env_values = true)]
    pub session: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all saved builds.
    #[command(alias = "ls")]
    List,

    /// Show details of a build.
    Show {
        /// Build id or name.
        build: String,
    },

    /// Create a new build with default values.
    New {
        /// Name to give the build instead of the generated one.
        #[arg(long)]
        name: Option<String>,
    },

    /// Copy a build under a new id.
    #[command(alias = "cp")]
    Duplicate {
        /// Build id or name.
        build: String,
    },

    /// Delete a build.
    #[command(alias = "rm")]
    Remove {
        /// Build id or name.
        build: String,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Edit fields of a saved build.
    Edit(build::EditArgs),

    /// Print (or write) all builds as JSON.
    Export {
        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<std::path::PathBuf>,
    },

    /// Replace all builds with the contents of a JSON export.
    Import {
        /// Path to a file produced by `bman export`.
        file: std::path::PathBuf,
    },

    /// Make a build active on the live account.
    Apply {
        /// Build id or name.
        build: String,

        /// Re-apply every part even if the build is already current.
        #[arg(long)]
        force: bool,
    },

    /// Forget the active build without touching the live account.
    Clear,

    /// Show the active build and whether it is out of date.
    Status,

    /// Show the live account state as read from the game.
    Live,

    /// Copy live account state into a saved build.
    #[command(name = "import-live")]
    ImportLive {
        /// Build id or name.
        build: String,

        /// Copy the live faction.
        #[arg(long)]
        fraction: bool,

        /// Copy the learned skills.
        #[arg(long)]
        skill: bool,

        /// Copy the troop counts.
        #[arg(long)]
        army: bool,
    },

    /// Equipment set names (sync from the game, list).
    Inventory {
        #[command(subcommand)]
        action: InventoryCommand,
    },

    /// Browse the fixed catalogs.
    Catalog {
        #[command(subcommand)]
        resource: CatalogResource,
    },

    /// Start the REST API server for the browser overlay.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Export spans to OpenTelemetry (stdout exporter).
        #[arg(long)]
        otel: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum InventoryCommand {
    /// Fetch the inventory page and take over the set names shown there.
    Sync,
    /// List equipment sets with their current names.
    #[command(alias = "ls")]
    List,
}

#[derive(Subcommand)]
pub enum CatalogResource {
    /// All factions and subclasses.
    Fractions,
    /// Equipment sets.
    Inventory,
    /// Skills grouped by skill wheel section.
    Skills,
}
