//! Error types for caravan-sync.

use std::path::PathBuf;

use thiserror::Error;

use caravan_core::WorkspaceError;

/// All errors that can arise from sync and reconciliation operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from the workspace model (index, manifest, discovery).
    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `git` could not be invoked or produced unusable output for one
    /// repository.
    #[error("git failed for {path}: {message}")]
    Git { path: PathBuf, message: String },

    /// A push for one repository exited non-zero. Recorded per repository;
    /// never blocks the remaining repositories.
    #[error("push failed for '{package}' (exit code {code:?})")]
    PushFailed { package: String, code: Option<i32> },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
