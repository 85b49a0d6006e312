//! `caravan repos` — repository names on the hosting service.
//!
//! Reads from the local completion cache by default; `--refresh` refetches
//! from the service first. A failed refresh truncates the cache and falls
//! back to an empty listing rather than showing stale names.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use caravan_core::Settings;
use caravan_remote::{cache, HostClient};

use super::creds::stored_token;

/// Arguments for `caravan repos`.
#[derive(Args, Debug)]
pub struct ReposArgs {
    /// Refetch the repository list from the hosting service.
    #[arg(long)]
    pub refresh: bool,
}

impl ReposArgs {
    pub fn run(self, settings: &Settings) -> Result<()> {
        let home = dirs::home_dir().context("could not determine home directory")?;

        let cache = if self.refresh {
            let token = stored_token(&home, settings)?
                .context("no API token stored; run `caravan creds save <username> <token>` first")?;
            let client = HostClient::new(&settings.host_url, token);
            match cache::refresh_at(&home, &client) {
                Ok(cache) => cache,
                Err(err) => {
                    println!("{} refresh failed: {err}", "!".yellow().bold());
                    cache::load_at(&home)
                }
            }
        } else {
            cache::load_at(&home)
        };

        if cache.names.is_empty() {
            println!("No cached repository names. Run `caravan repos --refresh`.");
            return Ok(());
        }
        for name in &cache.names {
            println!("{name}");
        }
        if let Some(fetched_at) = cache.fetched_at {
            println!("({} names, fetched {})", cache.names.len(), fetched_at.to_rfc3339());
        }
        Ok(())
    }
}
