//! `caravan keys` — SSH key provisioning for the hosting service.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use caravan_core::Settings;
use caravan_remote::{ssh, HostClient, RemoteError};

use super::creds::stored_token;

/// Manage SSH keys for the hosting service.
#[derive(Subcommand, Debug)]
pub enum KeysCommand {
    /// List local keys and whether the service knows them.
    List,

    /// Upload a local key (or generate a new one) to the service.
    Add(AddArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Name of the key under ~/.ssh. Defaults to the first local key, or
    /// to `caravan_ed25519` with --new.
    pub name: Option<String>,

    /// Generate a fresh keypair instead of uploading an existing one.
    #[arg(long)]
    pub new: bool,
}

pub fn run(cmd: KeysCommand, settings: &Settings) -> Result<()> {
    match cmd {
        KeysCommand::List => list(settings),
        KeysCommand::Add(args) => add(args, settings),
    }
}

fn list(settings: &Settings) -> Result<()> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    let local = ssh::local_keys_at(&home);
    if local.is_empty() {
        println!("No SSH keys under ~/.ssh. Run `caravan keys add --new`.");
        return Ok(());
    }

    // Remote key list is best-effort: without a token or a connection the
    // listing degrades to local-only.
    let remote_keys = match stored_token(&home, settings)? {
        Some(token) => match HostClient::new(&settings.host_url, token).list_ssh_keys() {
            Ok(keys) => Some(keys),
            Err(err @ RemoteError::Unavailable { .. }) => {
                println!("{} {err}; showing local keys only", "!".yellow().bold());
                None
            }
            Err(err) => return Err(err).context("failed to list keys on the hosting service"),
        },
        None => None,
    };

    for key in &local {
        let marker = match &remote_keys {
            Some(remote) => {
                if remote.iter().any(|r| r.key.trim() == key.public_key) {
                    "uploaded".green().to_string()
                } else {
                    "not uploaded".yellow().to_string()
                }
            }
            None => "unknown".bright_black().to_string(),
        };
        println!("{}  {}  [{marker}]", key.name, key.path.display());
    }
    Ok(())
}

fn add(args: AddArgs, settings: &Settings) -> Result<()> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    let token = stored_token(&home, settings)?
        .context("no API token stored; run `caravan creds save <username> <token>` first")?;
    let client = HostClient::new(&settings.host_url, token);

    let key = if args.new {
        let name = args.name.unwrap_or_else(|| "caravan_ed25519".to_string());
        let key = ssh::generate_at(&home, &name).context("key generation failed")?;
        println!("✓ Generated {}(.pub)", key.path.display());
        key
    } else {
        let local = ssh::local_keys_at(&home);
        match args.name {
            Some(name) => local
                .into_iter()
                .find(|k| k.name == name)
                .with_context(|| format!("no key named '{name}' under ~/.ssh"))?,
            None => match local.into_iter().next() {
                Some(key) => key,
                None => bail!("no SSH keys under ~/.ssh; rerun with --new to generate one"),
            },
        }
    };

    client
        .add_ssh_key(&key.name, &key.public_key)
        .context("failed to upload the key")?;
    println!("✓ Uploaded '{}' to {}", key.name, settings.host_url);
    Ok(())
}
