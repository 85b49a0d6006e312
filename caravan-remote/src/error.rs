//! Error types for caravan-remote.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from hosting-service and credential
/// operations.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Network-level failure — no connection, DNS, TLS. Callers degrade to
    /// local-only data.
    #[error("hosting service unreachable: {message}")]
    Unavailable { message: String },

    /// The service answered with an error status.
    #[error("hosting service error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// A response body could not be decoded.
    #[error("malformed response from hosting service: {0}")]
    Decode(#[source] std::io::Error),

    /// More than one repository matches an exact name and no namespace was
    /// given to disambiguate.
    #[error("{count} repositories are named '{name}'; pass a namespace to disambiguate")]
    Ambiguous { name: String, count: usize },

    /// Local filesystem failure (credential file, cache file, key files).
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML (credential/cache file) serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// `ssh-keygen` could not be run or exited non-zero.
    #[error("ssh-keygen failed: {message}")]
    KeyGen { message: String },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,
}

impl From<ureq::Error> for RemoteError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => RemoteError::Api {
                status,
                message: response
                    .into_string()
                    .unwrap_or_else(|_| "unreadable error body".to_string()),
            },
            other => RemoteError::Unavailable {
                message: other.to_string(),
            },
        }
    }
}

/// Convenience constructor for [`RemoteError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RemoteError {
    RemoteError::Io {
        path: path.into(),
        source,
    }
}
