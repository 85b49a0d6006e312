//! # caravan-core
//!
//! Workspace model for the caravan tools: settings, workspace discovery,
//! the checkout index, the typed manifest document, and the dependency
//! graph. Everything here is synchronous filesystem state; process
//! invocation and network access live in the sibling crates.

pub mod deps;
pub mod error;
pub mod index;
pub mod manifest;
pub mod settings;
pub mod types;
pub mod workspace;

pub use error::WorkspaceError;
pub use index::{Index, IndexEntry};
pub use manifest::{InsertPosition, ManifestDoc};
pub use settings::Settings;
pub use types::RepoEntry;
pub use workspace::Workspace;
