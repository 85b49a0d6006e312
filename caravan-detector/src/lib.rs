//! Divergence detection for caravan workspaces.
//!
//! [`probe`] reads one package's three independent URL sources (workspace
//! index, manifest, local git remote) into a [`RepoEntry`];
//! [`classify`] maps the entry to exactly one [`DivergenceCase`]. Probing
//! does I/O; classification is a pure total function so the decision table
//! can be tested exhaustively.
//!
//! The local remote URL is read straight out of `<pkg>/.git/config` — the
//! checkout's own record of its origin — so probing never spawns a process.

use std::path::Path;

use caravan_core::index::Index;
use caravan_core::manifest::ManifestDoc;
use caravan_core::types::RepoEntry;
use caravan_core::workspace::Workspace;
use caravan_core::WorkspaceError;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// How one package's manifest and local git remote relate.
///
/// The workspace index never participates in classification; it is the
/// *output* of a reconciliation pass, not an input to the decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DivergenceCase {
    /// Manifest and local remote agree. No action.
    Consistent,
    /// Both present but different — the git remote wins; the manifest must
    /// be corrected.
    ManifestStale {
        manifest_url: String,
        remote_url: String,
    },
    /// The manifest declares a URL but the directory is not a git checkout.
    /// The declaration should be removed.
    ManifestOrphaned { manifest_url: String },
    /// A git remote exists but the manifest declares no (or an ambiguous)
    /// URL. The manifest should be populated from the remote.
    ManifestMissing { remote_url: String },
    /// Neither source has a URL — the package is not under version control.
    /// Informational only.
    Untracked,
}

/// Errors from probing a package.
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The package's manifest is unreadable or malformed.
    #[error(transparent)]
    Manifest(WorkspaceError),
}

// ---------------------------------------------------------------------------
// Probing
// ---------------------------------------------------------------------------

/// Build a [`RepoEntry`] for `name` by reading all three URL sources.
///
/// A missing `.git` directory and a zero-or-ambiguous manifest URL both
/// map to `None` fields; only a broken manifest is an error, so callers
/// can skip that package and keep going.
pub fn probe(ws: &Workspace, index: &Index, name: &str) -> Result<RepoEntry, DetectError> {
    let manifest = ManifestDoc::load(&ws.manifest_path(name)).map_err(DetectError::Manifest)?;

    let mut entry = RepoEntry::new(name);
    entry.index_url = index.get(name).map(|e| e.uri.clone());
    entry.manifest_url = manifest.single_url();
    entry.local_remote_url = git_remote_url(&ws.package_dir(name));
    Ok(entry)
}

/// First `url` of `[remote "origin"]` in `<dir>/.git/config`, if the
/// directory is a git checkout with a configured remote.
pub fn git_remote_url(dir: &Path) -> Option<String> {
    let config = std::fs::read_to_string(dir.join(".git").join("config")).ok()?;
    let mut in_origin = false;
    for line in config.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            in_origin = trimmed == "[remote \"origin\"]";
            continue;
        }
        if in_origin {
            if let Some(rest) = trimmed.strip_prefix("url") {
                let rest = rest.trim_start();
                if let Some(url) = rest.strip_prefix('=') {
                    let url = url.trim();
                    if !url.is_empty() {
                        return Some(url.to_string());
                    }
                }
            }
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Map a probed entry to exactly one divergence case. Pure; no I/O.
pub fn classify(entry: &RepoEntry) -> DivergenceCase {
    match (&entry.manifest_url, &entry.local_remote_url) {
        (Some(manifest), Some(remote)) if manifest == remote => DivergenceCase::Consistent,
        (Some(manifest), Some(remote)) => DivergenceCase::ManifestStale {
            manifest_url: manifest.clone(),
            remote_url: remote.clone(),
        },
        (Some(manifest), None) => DivergenceCase::ManifestOrphaned {
            manifest_url: manifest.clone(),
        },
        (None, Some(remote)) => DivergenceCase::ManifestMissing {
            remote_url: remote.clone(),
        },
        (None, None) => DivergenceCase::Untracked,
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
