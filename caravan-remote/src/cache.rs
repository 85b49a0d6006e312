//! Repo-name cache for shell completion.
//!
//! A small YAML state file under `~/.caravan/`. On a failed refresh the
//! cache is truncated rather than left stale — a dead connection means the
//! old names are not trustworthy either.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use caravan_core::settings::config_dir_at;

use crate::api::HostClient;
use crate::error::{io_err, RemoteError};

/// On-disk cache payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RepoCache {
    pub fetched_at: Option<DateTime<Utc>>,
    pub names: Vec<String>,
}

/// `<home>/.caravan/repo_cache.yaml` — pure, no I/O.
pub fn cache_path_at(home: &Path) -> PathBuf {
    config_dir_at(home).join("repo_cache.yaml")
}

/// Load the cache; a missing or unparseable file is an empty cache.
pub fn load_at(home: &Path) -> RepoCache {
    let path = cache_path_at(home);
    std::fs::read_to_string(&path)
        .ok()
        .and_then(|contents| serde_yaml::from_str(&contents).ok())
        .unwrap_or_default()
}

/// Atomically save the cache.
pub fn save_at(home: &Path, cache: &RepoCache) -> Result<(), RemoteError> {
    let dir = config_dir_at(home);
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
    }
    let path = cache_path_at(home);
    let tmp = path.with_extension("yaml.tmp");
    let yaml = serde_yaml::to_string(cache)?;
    std::fs::write(&tmp, yaml).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}

/// Fetch the current repo list and rewrite the cache.
///
/// On failure the cache is flushed to empty and the error is returned for
/// reporting; callers carry on with local-only data.
pub fn refresh_at(home: &Path, client: &HostClient) -> Result<RepoCache, RemoteError> {
    match client.list_repos() {
        Ok(repos) => {
            let cache = RepoCache {
                fetched_at: Some(Utc::now()),
                names: repos.into_iter().map(|r| r.name).collect(),
            };
            save_at(home, &cache)?;
            Ok(cache)
        }
        Err(err) => {
            tracing::warn!("repo cache refresh failed: {err}");
            save_at(home, &RepoCache::default())?;
            Err(err)
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_cache_loads_empty() {
        let home = TempDir::new().expect("tempdir");
        assert_eq!(load_at(home.path()), RepoCache::default());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let home = TempDir::new().expect("tempdir");
        let cache = RepoCache {
            fetched_at: Some(Utc::now()),
            names: vec!["nav".to_string(), "nav_planner".to_string()],
        };
        save_at(home.path(), &cache).expect("save");
        assert_eq!(load_at(home.path()), cache);
        assert!(!cache_path_at(home.path()).with_extension("yaml.tmp").exists());
    }

    #[test]
    fn corrupt_cache_degrades_to_empty() {
        let home = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(config_dir_at(home.path())).expect("mkdir");
        std::fs::write(cache_path_at(home.path()), ":: not yaml ::").expect("write");
        assert_eq!(load_at(home.path()), RepoCache::default());
    }
}
