//! `caravan deps` — dependency graph as Graphviz DOT.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use caravan_core::deps::DepGraph;
use caravan_core::Workspace;

/// Arguments for `caravan deps`.
#[derive(Args, Debug)]
pub struct DepsArgs {
    /// Restrict the graph to this package and its transitive dependencies.
    pub package: Option<String>,

    /// Include dependencies that are not workspace packages.
    #[arg(long)]
    pub all: bool,
}

impl DepsArgs {
    pub fn run(self) -> Result<()> {
        let ws = Workspace::discover().context("not inside a workspace — run `caravan init` first")?;
        let graph = DepGraph::build(&ws, self.all).context("failed to build dependency graph")?;

        for name in &graph.skipped {
            eprintln!(
                "{} '{name}' skipped: manifest could not be parsed",
                "!".yellow().bold()
            );
        }

        let graph = match &self.package {
            Some(package) => graph
                .reachable_from(package)
                .with_context(|| format!("package '{package}' not found in the workspace"))?,
            None => graph,
        };

        // DOT on stdout so it pipes straight into `dot -Tsvg`.
        print!("{}", graph.to_dot());
        Ok(())
    }
}
