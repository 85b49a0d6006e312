//! Error types for caravan-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from workspace model operations.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// Underlying I/O failure (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error (write/save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// No workspace root was found walking upward from `start`.
    #[error("not inside a workspace (searched upward from {start})")]
    NotAWorkspace { start: PathBuf },

    /// `init` was invoked inside an existing workspace.
    #[error("already inside a workspace rooted at {root}")]
    AlreadyAWorkspace { root: PathBuf },

    /// The index file exists but could not be parsed.
    #[error("failed to parse index at {path}: {source}")]
    IndexParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The index could not be persisted. Fatal for the invocation; any
    /// manifest fixes already applied stay in place.
    #[error("failed to write index at {path}: {source}")]
    IndexWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One package's manifest is unreadable or malformed. Callers skip the
    /// package and continue the pass.
    #[error("failed to parse manifest at {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    /// The settings file exists but could not be parsed.
    #[error("failed to parse settings at {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None` — cannot locate `~/.caravan/`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}
