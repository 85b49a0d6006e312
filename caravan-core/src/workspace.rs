//! Workspace discovery and package enumeration.
//!
//! # On-disk layout
//!
//! ```text
//! <root>/
//!   src/
//!     .rosinstall          (index — single source of truth for checkouts)
//!     <package_a>/
//!       package.xml        (manifest)
//!     <package_b>/
//!       ...
//! ```
//!
//! The index file itself marks the workspace root: the first ancestor of the
//! starting directory that contains `src/.rosinstall` wins. There is no
//! second marker file that could disagree with the index.

use std::path::{Path, PathBuf};

use crate::error::WorkspaceError;
use crate::index::Index;

/// File name of the workspace index, relative to the source root.
pub const INDEX_FILE: &str = ".rosinstall";

/// File name of a package manifest, relative to the package directory.
pub const MANIFEST_FILE: &str = "package.xml";

/// A located workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Walk upward from `start` until a directory containing
    /// `src/.rosinstall` is found.
    ///
    /// Returns `WorkspaceError::NotAWorkspace` when the filesystem root is
    /// reached without a match; the CLI treats that as fatal.
    pub fn discover_at(start: &Path) -> Result<Self, WorkspaceError> {
        let mut dir = start.to_path_buf();
        loop {
            if dir.join("src").join(INDEX_FILE).is_file() {
                return Ok(Self { root: dir });
            }
            if !dir.pop() {
                return Err(WorkspaceError::NotAWorkspace {
                    start: start.to_path_buf(),
                });
            }
        }
    }

    /// `discover_at` convenience wrapper starting at the current directory.
    pub fn discover() -> Result<Self, WorkspaceError> {
        Self::discover_at(&std::env::current_dir()?)
    }

    /// Initialize a new workspace at `root`: creates `src/` and an empty
    /// index.
    ///
    /// Refuses with `WorkspaceError::AlreadyAWorkspace` when `root` is
    /// already inside a workspace.
    pub fn init_at(root: &Path) -> Result<Self, WorkspaceError> {
        if let Ok(existing) = Self::discover_at(root) {
            return Err(WorkspaceError::AlreadyAWorkspace {
                root: existing.root,
            });
        }
        let src = root.join("src");
        std::fs::create_dir_all(&src)?;
        Index::empty().write(&src)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/src/` — the source root all packages live under.
    pub fn src_root(&self) -> PathBuf {
        self.root.join("src")
    }

    /// `<root>/src/.rosinstall` — pure, no I/O.
    pub fn index_path(&self) -> PathBuf {
        self.src_root().join(INDEX_FILE)
    }

    /// `<root>/src/<name>/` — pure, no I/O.
    pub fn package_dir(&self, name: &str) -> PathBuf {
        self.src_root().join(name)
    }

    /// `<root>/src/<name>/package.xml` — pure, no I/O.
    pub fn manifest_path(&self, name: &str) -> PathBuf {
        self.package_dir(name).join(MANIFEST_FILE)
    }

    /// Sorted names of all direct subdirectories of the source root that
    /// contain a manifest file.
    ///
    /// A package's name is its directory name; nested packages are not
    /// searched for.
    pub fn package_names(&self) -> Result<Vec<String>, WorkspaceError> {
        let mut names: Vec<String> = std::fs::read_dir(self.src_root())?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter(|e| e.path().join(MANIFEST_FILE).is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
