//! `caravan pkg create <name>` — scaffold a package, optionally with a
//! freshly created hosting repository.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};

use caravan_core::{InsertPosition, ManifestDoc, Settings, Workspace};
use caravan_remote::HostClient;
use caravan_scaffold::{PackageContext, PackageKind, Scaffold};
use caravan_sync::git;

use super::creds::stored_token;

/// Scaffold and register packages.
#[derive(Subcommand, Debug)]
pub enum PkgCommand {
    /// Create a new package under src/.
    Create(CreateArgs),

    /// Declare a dependency in a package's manifest.
    Depend(DependArgs),
}

#[derive(Args, Debug)]
pub struct DependArgs {
    /// Package whose manifest to edit.
    pub package: String,

    /// Dependency to declare.
    pub dependency: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Package name; becomes the directory name under src/.
    pub name: String,

    /// Package kind: lib | exec.
    #[arg(long, short = 'k', value_name = "KIND", default_value = "lib")]
    pub kind: KindArg,

    /// Also create the repository on the hosting service and record its
    /// URL in the manifest and index.
    #[arg(long)]
    pub repo: bool,

    /// Namespace to create the repository in (defaults to your user
    /// namespace). Only meaningful with --repo.
    #[arg(long, requires = "repo")]
    pub namespace: Option<String>,
}

/// Thin wrapper so clap can parse `PackageKind` from CLI args.
#[derive(Debug, Clone, Default)]
pub struct KindArg(pub PackageKind);

impl FromStr for KindArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lib" | "library" => Ok(Self(PackageKind::Library)),
            "exec" | "executable" => Ok(Self(PackageKind::Executable)),
            other => Err(format!("unknown package kind '{other}'; expected: lib, exec")),
        }
    }
}

impl fmt::Display for KindArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            PackageKind::Library => write!(f, "lib"),
            PackageKind::Executable => write!(f, "exec"),
        }
    }
}

pub fn run(cmd: PkgCommand, settings: &Settings) -> Result<()> {
    match cmd {
        PkgCommand::Create(args) => create(args, settings),
        PkgCommand::Depend(args) => depend(args),
    }
}

fn depend(args: DependArgs) -> Result<()> {
    let ws = Workspace::discover().context("not inside a workspace — run `caravan init` first")?;
    let mut doc = ManifestDoc::load(&ws.manifest_path(&args.package))
        .with_context(|| format!("failed to load manifest for '{}'", args.package))?;

    if doc.insert_dependency(&args.dependency, InsertPosition::GroupWithDepends) {
        doc.save()
            .with_context(|| format!("failed to save manifest for '{}'", args.package))?;
        println!("✓ '{}' now depends on '{}'", args.package, args.dependency);
    } else {
        println!("'{}' already depends on '{}'", args.package, args.dependency);
    }
    Ok(())
}

fn create(args: CreateArgs, settings: &Settings) -> Result<()> {
    let ws = Workspace::discover().context("not inside a workspace — run `caravan init` first")?;

    let (maintainer_name, maintainer_email) = git::user_info()
        .context("git user.name / user.email are not configured; set them first")?;

    let scaffold = Scaffold::new().context("failed to load package templates")?;
    let ctx = PackageContext {
        pkg_name: args.name.clone(),
        kind: args.kind.0,
        maintainer_name,
        maintainer_email,
    };
    let pkg_dir = scaffold
        .write_into(&ctx, &ws.src_root())
        .with_context(|| format!("failed to scaffold '{}'", args.name))?;
    println!("✓ Created package skeleton at '{}'", pkg_dir.display());

    if args.repo {
        let url = create_hosted_repo(&args, settings)?;
        record_url(&ws, &args.name, &url)?;
        println!("✓ Repository URL is: {url}");
        println!("  Next: git init, add the remote, commit, push");
    } else {
        println!("  Next: put the package under version control and run `caravan reconcile`");
    }
    Ok(())
}

fn create_hosted_repo(args: &CreateArgs, settings: &Settings) -> Result<String> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    let token = stored_token(&home, settings)?
        .context("no API token stored; run `caravan creds save <username> <token>` first")?;
    let client = HostClient::new(&settings.host_url, token);

    let namespace_id = match &args.namespace {
        Some(wanted) => {
            let namespaces = client.list_namespaces().context("failed to list namespaces")?;
            let ns = namespaces
                .iter()
                .find(|ns| ns.name == *wanted || ns.path == *wanted)
                .with_context(|| format!("no namespace named '{wanted}'"))?;
            Some(ns.id)
        }
        None => None,
    };

    if let Some(existing) = client
        .find_repo(&args.name, args.namespace.as_deref())
        .context("repository lookup failed")?
    {
        bail!(
            "repository exists already: {}",
            existing.url(settings.use_ssh)
        );
    }

    let descriptor = client
        .create_repo(&args.name, namespace_id)
        .with_context(|| format!("failed to create repository '{}'", args.name))?;
    Ok(descriptor.url(settings.use_ssh).to_string())
}

/// Write the new repository URL into the scaffolded manifest (right before
/// the closing package tag) and into the index.
fn record_url(ws: &Workspace, name: &str, url: &str) -> Result<()> {
    let mut doc = ManifestDoc::load(&ws.manifest_path(name))
        .with_context(|| format!("failed to load manifest for '{name}'"))?;
    let line = doc
        .lines()
        .iter()
        .position(|l| l.trim() == "</package>")
        .unwrap_or(doc.lines().len());
    doc.insert_url(url, line);
    doc.save()
        .with_context(|| format!("failed to save manifest for '{name}'"))?;

    let mut index = caravan_core::Index::load(&ws.src_root()).context("failed to load index")?;
    index.upsert(name, url);
    index.write(&ws.src_root()).context("failed to write index")?;
    Ok(())
}
