//! `caravan reconcile` — interactive divergence repair.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use caravan_core::Workspace;
use caravan_sync::{reconcile, FixAction};

use crate::prompt::InquirePrompter;

/// Arguments for `caravan reconcile`.
#[derive(Args, Debug)]
pub struct ReconcileArgs {}

impl ReconcileArgs {
    pub fn run(self) -> Result<()> {
        let ws = Workspace::discover().context("not inside a workspace — run `caravan init` first")?;
        let mut prompter = InquirePrompter;

        let report = reconcile(&ws, &mut prompter).context("reconciliation failed")?;

        for fix in &report.fixed {
            let label = match fix.action {
                FixAction::UrlReplaced => "replaced URL",
                FixAction::UrlInserted => "inserted URL",
                FixAction::UrlRemoved => "removed URL",
            };
            println!("{} '{}': {label}", "✎".green().bold(), fix.package);
            print!("{}", fix.preview);
        }
        for name in &report.declined {
            println!("{} '{name}': left as is", "·".bright_black());
        }
        for name in &report.untracked {
            println!(
                "{} '{name}' is not under version control — consider putting it under git",
                "i".cyan().bold()
            );
        }
        for (name, reason) in &report.failed {
            println!("{} '{name}' skipped: {reason}", "✗".red().bold());
        }

        println!(
            "✓ {} consistent, {} fixed, {} declined, {} untracked, {} failed; {} index entr{} updated",
            report.consistent.len(),
            report.fixed.len(),
            report.declined.len(),
            report.untracked.len(),
            report.failed.len(),
            report.index_updates,
            if report.index_updates == 1 { "y" } else { "ies" },
        );
        Ok(())
    }
}
