//! `caravan status` — per-repository git state across the workspace.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use caravan_core::Workspace;
use caravan_sync::{SystemGit, Vcs};

/// Arguments for `caravan status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone)]
struct RepoRow {
    package: String,
    remote: Option<String>,
    ahead: u32,
    behind: u32,
    dirty: bool,
    error: Option<String>,
}

#[derive(Serialize)]
struct RepoRowJson {
    package: String,
    remote: Option<String>,
    ahead: u32,
    behind: u32,
    dirty: bool,
    error: Option<String>,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "package")]
    package: String,
    #[tabled(rename = "state")]
    state: String,
    #[tabled(rename = "ahead")]
    ahead: String,
    #[tabled(rename = "behind")]
    behind: String,
    #[tabled(rename = "remote")]
    remote: String,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let ws = Workspace::discover().context("not inside a workspace — run `caravan init` first")?;
        let vcs = SystemGit;

        let mut rows = Vec::new();
        for name in ws.package_names().context("failed to enumerate packages")? {
            let dir = ws.package_dir(&name);
            let remote = vcs.remote_url(&dir);
            if !dir.join(".git").exists() {
                rows.push(RepoRow {
                    package: name,
                    remote,
                    ahead: 0,
                    behind: 0,
                    dirty: false,
                    error: None,
                });
                continue;
            }
            match vcs.status(&dir) {
                Ok(status) => rows.push(RepoRow {
                    package: name,
                    remote,
                    ahead: status.ahead,
                    behind: status.behind,
                    dirty: status.dirty,
                    error: None,
                }),
                Err(err) => rows.push(RepoRow {
                    package: name,
                    remote,
                    ahead: 0,
                    behind: 0,
                    dirty: false,
                    error: Some(err.to_string()),
                }),
            }
        }

        if self.json {
            print_json(rows)?;
        } else {
            print_table(rows);
        }
        Ok(())
    }
}

fn print_json(rows: Vec<RepoRow>) -> Result<()> {
    let payload: Vec<RepoRowJson> = rows
        .into_iter()
        .map(|row| RepoRowJson {
            package: row.package,
            remote: row.remote,
            ahead: row.ahead,
            behind: row.behind,
            dirty: row.dirty,
            error: row.error,
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(rows: Vec<RepoRow>) {
    if rows.is_empty() {
        println!("No packages under src/.");
        return;
    }

    let unpushed = rows.iter().filter(|r| r.ahead > 0).count();
    let table_rows: Vec<StatusTableRow> = rows
        .iter()
        .map(|row| StatusTableRow {
            package: row.package.clone(),
            state: state_label(row),
            ahead: row.ahead.to_string(),
            behind: row.behind.to_string(),
            remote: row.remote.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");

    if unpushed > 0 {
        println!(
            "{} {unpushed} repositor{} with unpushed commits. Run 'caravan sync' to push and update.",
            "!".yellow().bold(),
            if unpushed == 1 { "y" } else { "ies" },
        );
    }
}

fn state_label(row: &RepoRow) -> String {
    if let Some(err) = &row.error {
        return format!("{} {err}", "ERROR".red().bold());
    }
    if row.remote.is_none() {
        return "UNTRACKED".bright_black().bold().to_string();
    }
    if row.dirty {
        return "DIRTY".yellow().bold().to_string();
    }
    if row.ahead > 0 {
        return "UNPUSHED".yellow().bold().to_string();
    }
    if row.behind > 0 {
        return "BEHIND".cyan().bold().to_string();
    }
    "CLEAN".green().bold().to_string()
}
