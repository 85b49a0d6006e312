//! # caravan-remote
//!
//! Client-side plumbing for the code-hosting service: the JSON API client,
//! credential storage backends, SSH key provisioning, and the repo-name
//! completion cache. Everything blocks; nothing here retries.

pub mod api;
pub mod cache;
pub mod credentials;
pub mod error;
pub mod ssh;

pub use api::{HostClient, Namespace, RepoDescriptor};
pub use credentials::{CredentialStore, TOKEN, USERNAME};
pub use error::RemoteError;
pub use ssh::SshKey;
