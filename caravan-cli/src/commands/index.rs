//! `caravan index rebuild`

use anyhow::{Context, Result};
use clap::Subcommand;

use caravan_core::Workspace;
use caravan_sync::{update::rebuild_index, SystemGit};

/// Maintenance operations on the workspace index.
#[derive(Subcommand, Debug)]
pub enum IndexCommand {
    /// Discard the index and reconstruct it from the packages on disk.
    ///
    /// Use after deleting or moving packages by hand; entries for missing
    /// directories are dropped and every detected git remote is recorded.
    Rebuild,
}

pub fn run(cmd: IndexCommand) -> Result<()> {
    match cmd {
        IndexCommand::Rebuild => rebuild(),
    }
}

fn rebuild() -> Result<()> {
    let ws = Workspace::discover().context("not inside a workspace — run `caravan init` first")?;
    let index = rebuild_index(&ws, &SystemGit).context("index rebuild failed")?;
    println!(
        "✓ Rebuilt {} with {} entr{}",
        ws.index_path().display(),
        index.len(),
        if index.len() == 1 { "y" } else { "ies" },
    );
    Ok(())
}
