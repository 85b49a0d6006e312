//! `caravan sync` — workspace-wide push offers plus one bulk update.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use caravan_core::{Settings, Workspace};
use caravan_sync::{sync, SyncOptions, SystemGit};

use crate::prompt::InquirePrompter;

/// Arguments for `caravan sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Parallelism for the bulk-checkout tool (defaults from settings).
    #[arg(long, short = 'j')]
    pub jobs: Option<u32>,

    /// Extra arguments passed through to the bulk-checkout tool verbatim.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub extra: Vec<String>,
}

impl SyncArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let ws = Workspace::discover().context("not inside a workspace — run `caravan init` first")?;
        let vcs = SystemGit;
        let mut prompter = InquirePrompter;

        let report = sync(
            &ws,
            settings,
            &vcs,
            &mut prompter,
            &SyncOptions {
                jobs: self.jobs,
                extra_args: self.extra,
            },
        )
        .context("sync failed")?;

        println!(
            "✓ Index rebuilt with {} entries; {} pushed, {} declined or skipped",
            report.index_entries,
            report.pushed.len(),
            report.unpushed.len() - report.pushed.len() - report.push_failures.len(),
        );
        for (name, reason) in &report.status_failures {
            println!("{} status failed for '{name}': {reason}", "!".yellow().bold());
        }
        for (name, reason) in &report.push_failures {
            println!("{} push failed for '{name}': {reason}", "✗".red().bold());
        }
        match report.checkout_status {
            Some(0) => println!("✓ {} update finished", settings.checkout_tool),
            Some(code) => println!(
                "{} {} update exited with code {code}",
                "✗".red().bold(),
                settings.checkout_tool
            ),
            None => println!(
                "{} {} update was killed by a signal",
                "✗".red().bold(),
                settings.checkout_tool
            ),
        }

        if !report.success() {
            std::process::exit(1);
        }
        Ok(())
    }
}
