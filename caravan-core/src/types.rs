//! Domain types shared across the caravan workspace.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem
//! paths.

use std::fmt;

/// One package's identity across the three independent URL sources.
///
/// Constructed transiently during a reconciliation pass; never persisted as
/// a unit. Only `index_url` persists (through the index) and `manifest_url`
/// persists (through the manifest on disk).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoEntry {
    /// Package name; always equals the directory name under the source root.
    pub name: String,
    /// URL recorded in the workspace index, if the package is indexed.
    pub index_url: Option<String>,
    /// URL declared in the manifest. `None` covers both "no URL element"
    /// and "more than one URL element" (ambiguous is absent).
    pub manifest_url: Option<String>,
    /// URL of the local checkout's git remote, if a `.git` directory exists.
    pub local_remote_url: Option<String>,
}

impl RepoEntry {
    /// An entry with no URLs discovered yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            index_url: None,
            manifest_url: None,
            local_remote_url: None,
        }
    }
}

impl fmt::Display for RepoEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
