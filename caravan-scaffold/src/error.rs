//! Error types for caravan-scaffold.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from scaffolding operations.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Tera template engine error.
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Filesystem error while writing the package tree.
    #[error("scaffold io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The target package directory exists already; nothing is overwritten.
    #[error("package directory exists already: {path}")]
    PackageExists { path: PathBuf },
}

/// Convenience constructor for [`ScaffoldError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ScaffoldError {
    ScaffoldError::Io {
        path: path.into(),
        source,
    }
}
