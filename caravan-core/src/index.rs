//! The workspace index — the persistent ordered mapping consumed by the
//! external bulk-checkout tool.
//!
//! # On-disk format
//!
//! An ordered YAML list in the tool-compatible shape, one record per
//! package:
//!
//! ```yaml
//! - git:
//!     local-name: foo
//!     uri: git@host:team/foo.git
//!     version: master
//! ```
//!
//! Order reflects insertion order and is preserved across rewrites so the
//! file stays diff-friendly for operators who hand-edit it. `version` is
//! omitted when no constraint is recorded.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::WorkspaceError;
use crate::workspace::INDEX_FILE;

/// One checkout record: package name, remote URL, optional version spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    #[serde(rename = "local-name")]
    pub local_name: String,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Wire wrapper: every record is keyed by its SCM kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct IndexRecord {
    git: IndexEntry,
}

/// In-memory index. Entry order is significant and preserved.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Index {
    entries: Vec<IndexEntry>,
}

/// `<src_root>/.rosinstall` — pure, no I/O.
pub fn index_path(src_root: &Path) -> PathBuf {
    src_root.join(INDEX_FILE)
}

impl Index {
    /// An index with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the index from `<src_root>/.rosinstall`.
    ///
    /// An absent or empty file yields an empty index; a malformed file is
    /// `WorkspaceError::IndexParse` with the offending path.
    pub fn load(src_root: &Path) -> Result<Self, WorkspaceError> {
        let path = index_path(src_root);
        if !path.exists() {
            return Ok(Self::empty());
        }
        let contents = std::fs::read_to_string(&path)?;
        if contents.trim().is_empty() || contents.trim() == "[]" {
            return Ok(Self::empty());
        }
        let records: Vec<IndexRecord> = serde_yaml::from_str(&contents)
            .map_err(|e| WorkspaceError::IndexParse { path, source: e })?;
        Ok(Self {
            entries: records.into_iter().map(|r| r.git).collect(),
        })
    }

    /// Replace the entire contents with freshly discovered `(name, url)`
    /// pairs, in discovery order.
    ///
    /// Discovered entries carry no version constraint; rebuilding twice over
    /// the same input produces identical output.
    pub fn rebuild(discovered: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            entries: discovered
                .into_iter()
                .map(|(name, uri)| IndexEntry {
                    local_name: name,
                    uri,
                    version: None,
                })
                .collect(),
        }
    }

    /// All entries in order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Look up an entry by package name.
    pub fn get(&self, name: &str) -> Option<&IndexEntry> {
        self.entries.iter().find(|e| e.local_name == name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or update the URL for `name`.
    ///
    /// An existing entry keeps its ordinal position and its version spec;
    /// a new name is appended at the end with no version. Returns true when
    /// anything changed.
    pub fn upsert(&mut self, name: &str, url: &str) -> bool {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.local_name == name) {
            if entry.uri == url {
                return false;
            }
            entry.uri = url.to_string();
            return true;
        }
        self.entries.push(IndexEntry {
            local_name: name.to_string(),
            uri: url.to_string(),
            version: None,
        });
        true
    }

    /// Remove the entry for `name`. Returns true when an entry was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.local_name != name);
        self.entries.len() != before
    }

    /// Serialize to the on-disk YAML form.
    pub fn render(&self) -> Result<String, WorkspaceError> {
        if self.entries.is_empty() {
            return Ok("[]\n".to_string());
        }
        let records: Vec<IndexRecord> = self
            .entries
            .iter()
            .cloned()
            .map(|git| IndexRecord { git })
            .collect();
        Ok(serde_yaml::to_string(&records)?)
    }

    /// Atomically write the index to `<src_root>/.rosinstall`.
    ///
    /// Write flow: serialize → `.rosinstall.tmp` sibling → `rename`. A
    /// failed write is `WorkspaceError::IndexWrite` and is surfaced, not
    /// retried.
    pub fn write(&self, src_root: &Path) -> Result<(), WorkspaceError> {
        let path = index_path(src_root);
        let tmp = src_root.join(format!("{INDEX_FILE}.tmp"));
        let yaml = self.render()?;
        std::fs::write(&tmp, yaml)
            .map_err(|e| WorkspaceError::IndexWrite { path: tmp.clone(), source: e })?;
        std::fs::rename(&tmp, &path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            WorkspaceError::IndexWrite { path, source: e }
        })?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
