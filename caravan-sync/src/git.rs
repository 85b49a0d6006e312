//! Typed git accessor.
//!
//! Everything that talks to git goes through the [`Vcs`] trait so the
//! orchestration logic can be exercised against a fake. The system
//! implementation invokes `git` with argument arrays only — package names
//! and paths are never interpolated into a shell string.
//!
//! Remote URLs are read straight from `.git/config` (the checkout's own
//! record of its origin) rather than by spawning `git remote get-url`;
//! ahead/behind/dirty state comes from `git status --porcelain=v2 --branch`.

use std::path::Path;
use std::process::Command;

use crate::error::SyncError;

/// Ahead/behind/dirty summary for one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepoStatus {
    /// Local commits not on the configured upstream.
    pub ahead: u32,
    /// Upstream commits not in the local branch.
    pub behind: u32,
    /// Uncommitted changes (staged, unstaged, or untracked).
    pub dirty: bool,
}

/// Version-control operations the sync driver needs.
pub trait Vcs {
    /// URL of the `origin` remote, if the directory is a git checkout with
    /// one configured.
    fn remote_url(&self, dir: &Path) -> Option<String>;

    /// Ahead/behind counts and dirtiness for the checked-out branch.
    fn status(&self, dir: &Path) -> Result<RepoStatus, SyncError>;

    /// `git push` with the repository's configured upstream.
    fn push(&self, dir: &Path) -> Result<(), SyncError>;
}

/// The real thing: reads `.git/config`, spawns `git` for the rest.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGit;

impl Vcs for SystemGit {
    fn remote_url(&self, dir: &Path) -> Option<String> {
        caravan_detector::git_remote_url(dir)
    }

    fn status(&self, dir: &Path) -> Result<RepoStatus, SyncError> {
        let output = Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(["status", "--porcelain=v2", "--branch"])
            .output()
            .map_err(|e| SyncError::Git {
                path: dir.to_path_buf(),
                message: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(SyncError::Git {
                path: dir.to_path_buf(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_porcelain_status(&stdout))
    }

    fn push(&self, dir: &Path) -> Result<(), SyncError> {
        let status = Command::new("git")
            .arg("-C")
            .arg(dir)
            .arg("push")
            .status()
            .map_err(|e| SyncError::Git {
                path: dir.to_path_buf(),
                message: e.to_string(),
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(SyncError::PushFailed {
                package: dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| dir.display().to_string()),
                code: status.code(),
            })
        }
    }
}

/// Parse `git status --porcelain=v2 --branch` output.
///
/// The `# branch.ab +A -B` header carries ahead/behind; every non-header
/// line is a changed or untracked entry.
pub fn parse_porcelain_status(output: &str) -> RepoStatus {
    let mut status = RepoStatus::default();
    for line in output.lines() {
        if let Some(rest) = line.strip_prefix("# branch.ab ") {
            for field in rest.split_whitespace() {
                if let Some(n) = field.strip_prefix('+') {
                    status.ahead = n.parse().unwrap_or(0);
                } else if let Some(n) = field.strip_prefix('-') {
                    status.behind = n.parse().unwrap_or(0);
                }
            }
        } else if !line.starts_with('#') && !line.trim().is_empty() {
            status.dirty = true;
        }
    }
    status
}

/// `user.name` and `user.email` from the global git configuration, if both
/// are set.
pub fn user_info() -> Option<(String, String)> {
    let get = |key: &str| -> Option<String> {
        let output = Command::new("git")
            .args(["config", "--get", key])
            .output()
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!value.is_empty()).then_some(value)
    };
    Some((get("user.name")?, get("user.email")?))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
