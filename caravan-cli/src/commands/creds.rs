//! `caravan creds` — stored hosting-service credentials.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use caravan_core::Settings;
use caravan_remote::{CredentialStore, TOKEN, USERNAME};

/// Manage stored hosting-service credentials.
#[derive(Subcommand, Debug)]
pub enum CredsCommand {
    /// Store a username and API token.
    Save(SaveArgs),

    /// Show what is stored on this machine.
    Show,

    /// Remove every stored credential.
    Remove,
}

#[derive(Args, Debug)]
pub struct SaveArgs {
    pub username: String,
    pub token: String,
}

/// The stored API token, if any. Shared with the commands that talk to the
/// hosting service.
pub fn stored_token(home: &Path, settings: &Settings) -> Result<Option<String>> {
    let store = CredentialStore::open_at(home, settings);
    store.get(TOKEN).context("failed to read credential store")
}

pub fn run(cmd: CredsCommand, settings: &Settings) -> Result<()> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    let mut store = CredentialStore::open_at(&home, settings);

    match cmd {
        CredsCommand::Save(args) => {
            store
                .store(USERNAME, &args.username)
                .context("failed to store username")?;
            store.store(TOKEN, &args.token).context("failed to store token")?;
            println!("✓ Stored credentials for '{}'", args.username);
            Ok(())
        }
        CredsCommand::Show => {
            let username = store.get(USERNAME).context("failed to read credential store")?;
            let token = store.get(TOKEN).context("failed to read credential store")?;
            println!("Hosting credentials ({:?} backend)", settings.credential_backend);
            println!("==================");
            println!("Username: {}", username.as_deref().unwrap_or("-"));
            println!("Token   : {}", if token.is_some() { "******" } else { "-" });
            Ok(())
        }
        CredsCommand::Remove => {
            store.clear().context("failed to remove credentials")?;
            println!("✓ Removed stored credentials");
            Ok(())
        }
    }
}
