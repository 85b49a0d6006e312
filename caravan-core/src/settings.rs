//! Persistent tool configuration.
//!
//! # Storage layout
//!
//! ```text
//! ~/.caravan/
//!   config.yaml       (settings — rewritten on every load)
//!   repo_cache.yaml   (completion cache, owned by caravan-remote)
//! ```
//!
//! Missing keys are filled with their defaults and the file is rewritten on
//! load, so an on-disk config from an older version silently upgrades; keys
//! that are no longer used are dropped by the same rewrite.
//!
//! # API pattern
//!
//! Every function touching the filesystem has two forms:
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::WorkspaceError;

/// Where the credential store persists secrets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackend {
    /// Process-lifetime only; nothing touches disk.
    Ephemeral,
    /// `~/.caravan/credentials.yaml`, mode 0600.
    #[default]
    File,
}

/// Tool configuration, constructed once at process start and threaded by
/// reference into every component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the code-hosting service.
    pub host_url: String,
    /// Prefer SSH clone URLs over HTTPS ones.
    pub use_ssh: bool,
    /// Credential persistence backend.
    pub credential_backend: CredentialBackend,
    /// External bulk-checkout tool invoked by `caravan sync`.
    pub checkout_tool: String,
    /// Parallelism hint passed to the checkout tool when the caller gives none.
    pub default_jobs: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host_url: "https://gitlab.example.com".to_string(),
            use_ssh: true,
            credential_backend: CredentialBackend::default(),
            checkout_tool: "wstool".to_string(),
            default_jobs: 10,
        }
    }
}

/// `<home>/.caravan/`
pub fn config_dir_at(home: &Path) -> PathBuf {
    home.join(".caravan")
}

/// `<home>/.caravan/config.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    config_dir_at(home).join("config.yaml")
}

impl Settings {
    /// Load settings from `<home>/.caravan/config.yaml`.
    ///
    /// A missing file yields the defaults. In either case the merged result
    /// is written back so the file always reflects the current schema.
    pub fn load_at(home: &Path) -> Result<Self, WorkspaceError> {
        let path = config_path_at(home);
        let settings = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_yaml::from_str(&contents)
                .map_err(|e| WorkspaceError::SettingsParse { path: path.clone(), source: e })?
        } else {
            Settings::default()
        };
        settings.write_at(home)?;
        Ok(settings)
    }

    /// `load_at` convenience wrapper.
    pub fn load() -> Result<Self, WorkspaceError> {
        Self::load_at(&home()?)
    }

    /// Atomically write settings to `<home>/.caravan/config.yaml`.
    ///
    /// Write flow: serialize → `.yaml.tmp` sibling → `rename`.
    pub fn write_at(&self, home: &Path) -> Result<(), WorkspaceError> {
        let dir = config_dir_at(home);
        if !dir.exists() {
            std::fs::create_dir_all(&dir)?;
        }
        let path = config_path_at(home);
        let tmp = path.with_extension("yaml.tmp");
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(&tmp, yaml)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

pub(crate) fn home() -> Result<PathBuf, WorkspaceError> {
    dirs::home_dir().ok_or(WorkspaceError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn first_load_writes_defaults() {
        let home = TempDir::new().expect("tempdir");
        let settings = Settings::load_at(home.path()).expect("load");
        assert_eq!(settings, Settings::default());
        assert!(config_path_at(home.path()).exists());
    }

    #[test]
    fn second_load_is_byte_stable() {
        let home = TempDir::new().expect("tempdir");
        Settings::load_at(home.path()).expect("first load");
        let first = std::fs::read_to_string(config_path_at(home.path())).unwrap();
        Settings::load_at(home.path()).expect("second load");
        let second = std::fs::read_to_string(config_path_at(home.path())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn partial_config_upgrades_with_defaults() {
        let home = TempDir::new().expect("tempdir");
        let dir = config_dir_at(home.path());
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(config_path_at(home.path()), "checkout_tool: vcstool\n").unwrap();

        let settings = Settings::load_at(home.path()).expect("load");
        assert_eq!(settings.checkout_tool, "vcstool");
        assert_eq!(settings.default_jobs, 10);

        let rewritten = std::fs::read_to_string(config_path_at(home.path())).unwrap();
        assert!(rewritten.contains("default_jobs: 10"));
        assert!(rewritten.contains("checkout_tool: vcstool"));
    }

    #[test]
    fn tmp_file_cleaned_up_after_write() {
        let home = TempDir::new().expect("tempdir");
        Settings::default().write_at(home.path()).expect("write");
        let tmp = config_path_at(home.path()).with_extension("yaml.tmp");
        assert!(!tmp.exists(), ".tmp must be gone after successful write");
    }
}
