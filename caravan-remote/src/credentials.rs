//! Credential storage backends.
//!
//! # Storage layout
//!
//! ```text
//! ~/.caravan/
//!   credentials.yaml   (file backend — mode 0600, directory 0700)
//! ```
//!
//! Two backends, chosen through [`Settings::credential_backend`]:
//! - `Ephemeral` keeps values for the process lifetime only.
//! - `File` persists them under the caravan dot-directory.
//!
//! The store holds opaque key/value pairs; the keys in use are
//! [`USERNAME`] and [`TOKEN`]. Prompting for missing values is the CLI's
//! job — this layer never blocks on input.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use caravan_core::settings::{config_dir_at, CredentialBackend, Settings};

use crate::error::{io_err, RemoteError};

/// Key for the hosting-service login name.
pub const USERNAME: &str = "username";
/// Key for the hosting-service API token.
pub const TOKEN: &str = "token";

/// A credential store bound to one backend.
#[derive(Debug)]
pub enum CredentialStore {
    Ephemeral(BTreeMap<String, String>),
    File { path: PathBuf },
}

/// `<home>/.caravan/credentials.yaml` — pure, no I/O.
pub fn credentials_path_at(home: &Path) -> PathBuf {
    config_dir_at(home).join("credentials.yaml")
}

impl CredentialStore {
    /// Open the backend selected in `settings`, rooted at `home`.
    pub fn open_at(home: &Path, settings: &Settings) -> Self {
        match settings.credential_backend {
            CredentialBackend::Ephemeral => Self::Ephemeral(BTreeMap::new()),
            CredentialBackend::File => Self::File {
                path: credentials_path_at(home),
            },
        }
    }

    /// Read one value.
    pub fn get(&self, key: &str) -> Result<Option<String>, RemoteError> {
        match self {
            Self::Ephemeral(map) => Ok(map.get(key).cloned()),
            Self::File { path } => Ok(load_map(path)?.get(key).cloned()),
        }
    }

    /// Store one value, creating the file (0600) and directory (0700) as
    /// needed.
    pub fn store(&mut self, key: &str, value: &str) -> Result<(), RemoteError> {
        match self {
            Self::Ephemeral(map) => {
                map.insert(key.to_string(), value.to_string());
                Ok(())
            }
            Self::File { path } => {
                let mut map = load_map(path)?;
                map.insert(key.to_string(), value.to_string());
                save_map(path, &map)
            }
        }
    }

    /// Remove one value; absent keys are fine.
    pub fn delete(&mut self, key: &str) -> Result<(), RemoteError> {
        match self {
            Self::Ephemeral(map) => {
                map.remove(key);
                Ok(())
            }
            Self::File { path } => {
                let mut map = load_map(path)?;
                if map.remove(key).is_some() {
                    save_map(path, &map)?;
                }
                Ok(())
            }
        }
    }

    /// Remove everything this store holds.
    pub fn clear(&mut self) -> Result<(), RemoteError> {
        match self {
            Self::Ephemeral(map) => {
                map.clear();
                Ok(())
            }
            Self::File { path } => {
                if path.exists() {
                    std::fs::remove_file(&*path).map_err(|e| io_err(path.clone(), e))?;
                }
                Ok(())
            }
        }
    }
}

fn load_map(path: &Path) -> Result<BTreeMap<String, String>, RemoteError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    Ok(serde_yaml::from_str(&contents)?)
}

fn save_map(path: &Path, map: &BTreeMap<String, String>) -> Result<(), RemoteError> {
    let dir = path.parent().expect("credentials path has a parent");
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
        set_dir_permissions(dir)?;
    }
    let tmp = path.with_extension("yaml.tmp");
    let yaml = serde_yaml::to_string(map)?;
    std::fs::write(&tmp, yaml).map_err(|e| io_err(&tmp, e))?;
    set_file_permissions(&tmp)?;
    std::fs::rename(&tmp, path).map_err(|e| io_err(path, e))?;
    Ok(())
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), RemoteError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), RemoteError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), RemoteError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), RemoteError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
