//! # caravan-sync
//!
//! Multi-repository state reconciliation and workspace-wide sync.
//!
//! Call [`reconcile`] to detect and (with operator confirmation) fix
//! divergence between the index, the manifests, and the local git remotes;
//! call [`sync`] to push what's ahead and run the bulk-checkout tool over
//! the whole index.

pub mod diff;
pub mod error;
pub mod git;
pub mod prompt;
pub mod reconcile;
pub mod update;

pub use error::SyncError;
pub use git::{RepoStatus, SystemGit, Vcs};
pub use prompt::Prompter;
pub use reconcile::{reconcile, FixAction, FixRecord, ReconcileReport};
pub use update::{sync, SyncOptions, SyncReport};
