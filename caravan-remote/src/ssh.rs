//! Local SSH key discovery and provisioning.
//!
//! Key generation delegates to `ssh-keygen` invoked with argument arrays;
//! nothing here implements cryptography.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{io_err, RemoteError};

/// One local keypair, identified by its public half.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshKey {
    /// File stem under `~/.ssh` (e.g. `id_ed25519`).
    pub name: String,
    /// Path of the private key file.
    pub path: PathBuf,
    /// Contents of the `.pub` file, single line.
    pub public_key: String,
}

/// `<home>/.ssh/`
pub fn ssh_dir_at(home: &Path) -> PathBuf {
    home.join(".ssh")
}

/// All keypairs under `<home>/.ssh` that have a readable `.pub` file.
pub fn local_keys_at(home: &Path) -> Vec<SshKey> {
    let dir = ssh_dir_at(home);
    let Ok(entries) = std::fs::read_dir(&dir) else {
        return Vec::new();
    };
    let mut keys: Vec<SshKey> = entries
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let path = e.path();
            if path.extension().and_then(|s| s.to_str()) != Some("pub") {
                return None;
            }
            let public_key = std::fs::read_to_string(&path).ok()?.trim().to_string();
            if public_key.is_empty() {
                return None;
            }
            let private = path.with_extension("");
            Some(SshKey {
                name: private.file_name()?.to_string_lossy().into_owned(),
                path: private,
                public_key,
            })
        })
        .collect();
    keys.sort_by(|a, b| a.name.cmp(&b.name));
    keys
}

/// Generate a new passphrase-less ed25519 keypair named `name` under
/// `<home>/.ssh` and return it.
///
/// Refuses to overwrite an existing key file.
pub fn generate_at(home: &Path, name: &str) -> Result<SshKey, RemoteError> {
    let dir = ssh_dir_at(home);
    std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
    let path = dir.join(name);
    if path.exists() {
        return Err(RemoteError::KeyGen {
            message: format!("key file exists already: {}", path.display()),
        });
    }

    let output = Command::new("ssh-keygen")
        .arg("-t")
        .arg("ed25519")
        .arg("-N")
        .arg("")
        .arg("-f")
        .arg(&path)
        .arg("-C")
        .arg(format!("caravan:{name}"))
        .output()
        .map_err(|e| RemoteError::KeyGen {
            message: e.to_string(),
        })?;
    if !output.status.success() {
        return Err(RemoteError::KeyGen {
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let public_key = std::fs::read_to_string(path.with_extension("pub"))
        .map_err(|e| io_err(path.with_extension("pub"), e))?
        .trim()
        .to_string();
    Ok(SshKey {
        name: name.to_string(),
        path,
        public_key,
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn discovers_keys_with_public_halves() {
        let home = TempDir::new().expect("tempdir");
        let ssh = ssh_dir_at(home.path());
        std::fs::create_dir_all(&ssh).expect("mkdir");
        std::fs::write(ssh.join("id_ed25519"), "private").expect("write");
        std::fs::write(ssh.join("id_ed25519.pub"), "ssh-ed25519 AAAA dev@box\n").expect("write");
        std::fs::write(ssh.join("known_hosts"), "host data").expect("write");

        let keys = local_keys_at(home.path());
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].name, "id_ed25519");
        assert_eq!(keys[0].public_key, "ssh-ed25519 AAAA dev@box");
    }

    #[test]
    fn missing_ssh_dir_is_just_empty() {
        let home = TempDir::new().expect("tempdir");
        assert!(local_keys_at(home.path()).is_empty());
    }

    #[test]
    fn generate_refuses_existing_key() {
        let home = TempDir::new().expect("tempdir");
        let ssh = ssh_dir_at(home.path());
        std::fs::create_dir_all(&ssh).expect("mkdir");
        std::fs::write(ssh.join("mykey"), "private").expect("write");

        let err = generate_at(home.path(), "mykey").unwrap_err();
        assert!(matches!(err, RemoteError::KeyGen { .. }));
    }
}
