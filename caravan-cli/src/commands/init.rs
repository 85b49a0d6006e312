//! `caravan init [path]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use caravan_core::Workspace;

/// Arguments for `caravan init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize; created if absent. Defaults to the current
    /// directory.
    pub path: Option<PathBuf>,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let root = match self.path {
            Some(path) => {
                std::fs::create_dir_all(&path)
                    .with_context(|| format!("cannot create '{}'", path.display()))?;
                path.canonicalize()
                    .with_context(|| format!("cannot resolve '{}'", path.display()))?
            }
            None => std::env::current_dir().context("cannot determine current directory")?,
        };

        let ws = Workspace::init_at(&root)
            .with_context(|| format!("failed to initialize workspace at '{}'", root.display()))?;

        println!("✓ Initialized workspace at '{}'", ws.root().display());
        println!("  Index: {}", ws.index_path().display());
        println!("  Next: caravan pkg create <name>, or clone repositories under src/ and run caravan reconcile");
        Ok(())
    }
}
