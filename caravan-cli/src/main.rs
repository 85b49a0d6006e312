//! Caravan — multi-repository workspace tools.
//!
//! # Usage
//!
//! ```text
//! caravan init [path]
//! caravan pkg create <name> [--kind lib|exec] [--repo]
//! caravan pkg depend <package> <dependency>
//! caravan sync [--jobs N] [extra-args...]
//! caravan reconcile
//! caravan index rebuild
//! caravan status [--json]
//! caravan deps [package] [--all]
//! caravan repos [--refresh]
//! caravan creds save|show|remove
//! caravan keys list|add
//! ```

mod commands;
mod prompt;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use caravan_core::Settings;

use commands::{
    creds::CredsCommand, deps::DepsArgs, index::IndexCommand, init::InitArgs, keys::KeysCommand,
    pkg::PkgCommand, reconcile::ReconcileArgs, repos::ReposArgs, status::StatusArgs, sync::SyncArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "caravan",
    version,
    about = "Manage a workspace of many independent git repositories",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize a workspace (creates src/ and an empty index).
    Init(InitArgs),

    /// Scaffold and register packages.
    Pkg {
        #[command(subcommand)]
        command: PkgCommand,
    },

    /// Push what's ahead, then bulk-update every repository in the index.
    Sync(SyncArgs),

    /// Detect and fix divergence between index, manifests, and git remotes.
    Reconcile(ReconcileArgs),

    /// Maintain the workspace index.
    Index {
        #[command(subcommand)]
        command: IndexCommand,
    },

    /// Show per-repository git state across the workspace.
    Status(StatusArgs),

    /// Print the package dependency graph as Graphviz DOT.
    Deps(DepsArgs),

    /// List repository names on the hosting service (cached).
    Repos(ReposArgs),

    /// Manage stored hosting-service credentials.
    Creds {
        #[command(subcommand)]
        command: CredsCommand,
    },

    /// Manage SSH keys for the hosting service.
    Keys {
        #[command(subcommand)]
        command: KeysCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // One settings object for the whole invocation; threaded by reference
    // into every command that needs it.
    let settings = Settings::load().context("failed to load ~/.caravan/config.yaml")?;

    match cli.command {
        Commands::Init(args) => args.run(),
        Commands::Pkg { command } => commands::pkg::run(command, &settings),
        Commands::Sync(args) => args.run(&settings),
        Commands::Reconcile(args) => args.run(),
        Commands::Index { command } => commands::index::run(command),
        Commands::Status(args) => args.run(),
        Commands::Deps(args) => args.run(),
        Commands::Repos(args) => args.run(&settings),
        Commands::Creds { command } => commands::creds::run(command, &settings),
        Commands::Keys { command } => commands::keys::run(command, &settings),
    }
}
