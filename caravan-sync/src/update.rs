//! Workspace-wide sync: rebuild the index, offer to push what's ahead,
//! then hand the whole index to the bulk-checkout tool in one invocation.
//!
//! The bulk tool already parallelizes network I/O per repository, so it is
//! invoked exactly once for the whole index instead of per package; a
//! `-jN` parallelism hint is appended when the caller supplies none.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use caravan_core::index::Index;
use caravan_core::settings::Settings;
use caravan_core::workspace::Workspace;

use crate::error::{io_err, SyncError};
use crate::git::Vcs;
use crate::prompt::Prompter;

// ---------------------------------------------------------------------------
// Options and report
// ---------------------------------------------------------------------------

/// Caller-supplied knobs for one sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Explicit parallelism; overrides the settings default.
    pub jobs: Option<u32>,
    /// Extra arguments passed through to the bulk-checkout tool verbatim.
    pub extra_args: Vec<String>,
}

/// Outcome of one sync run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Entries in the rebuilt index.
    pub index_entries: usize,
    /// Repositories with local commits their remote does not have.
    pub unpushed: Vec<String>,
    /// Repositories pushed during this run.
    pub pushed: Vec<String>,
    /// Pushes that failed, with the reason. One failure never blocks the
    /// remaining repositories.
    pub push_failures: Vec<(String, String)>,
    /// Repositories whose status could not be read, with the reason.
    pub status_failures: Vec<(String, String)>,
    /// Exit code of the bulk-checkout tool, surfaced verbatim. `None` when
    /// the tool was killed by a signal.
    pub checkout_status: Option<i32>,
}

impl SyncReport {
    /// Full success: no failed pushes and a zero exit from the bulk tool.
    pub fn success(&self) -> bool {
        self.push_failures.is_empty() && self.checkout_status == Some(0)
    }
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

/// Rebuild the index purely from on-disk packages and their detected
/// remotes, and persist it.
///
/// Protects the subsequent bulk update against index entries for packages
/// someone deleted by hand. Packages without a detectable remote are
/// omitted — the checkout tool cannot act on a URL-less record; they
/// surface through `reconcile` as untracked instead.
pub fn rebuild_index(ws: &Workspace, vcs: &dyn Vcs) -> Result<Index, SyncError> {
    let mut discovered = Vec::new();
    for name in ws.package_names()? {
        match vcs.remote_url(&ws.package_dir(&name)) {
            Some(url) => discovered.push((name, url)),
            None => tracing::warn!("{name}: no git remote detected; omitted from index"),
        }
    }
    let index = Index::rebuild(discovered);
    index.write(&ws.src_root())?;
    Ok(index)
}

/// Repositories whose status reports outbound commits, plus per-repository
/// status failures.
///
/// Inspects ahead counts only — URL agreement is `reconcile`'s concern,
/// not this path's.
pub fn unpushed_repos(
    ws: &Workspace,
    vcs: &dyn Vcs,
) -> Result<(Vec<String>, Vec<(String, String)>), SyncError> {
    let mut unpushed = Vec::new();
    let mut failures = Vec::new();
    for name in ws.package_names()? {
        let dir = ws.package_dir(&name);
        if !dir.join(".git").exists() {
            continue;
        }
        match vcs.status(&dir) {
            Ok(status) if status.ahead > 0 => unpushed.push(name),
            Ok(_) => {}
            Err(err) => {
                tracing::warn!("{name}: status failed — {err}");
                failures.push((name, err.to_string()));
            }
        }
    }
    Ok((unpushed, failures))
}

/// Argument vector for the bulk-checkout tool.
///
/// `<tool> update -t <src> [extra...] [-jN]` — the `-jN` hint is appended
/// only when the caller passed no `-j` flag of their own.
pub fn checkout_args(
    src_root: &Path,
    jobs: Option<u32>,
    default_jobs: u32,
    extra: &[String],
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["update".into(), "-t".into(), src_root.into()];
    args.extend(extra.iter().map(OsString::from));
    if !extra.iter().any(|a| a.starts_with("-j")) {
        args.push(format!("-j{}", jobs.unwrap_or(default_jobs)).into());
    }
    args
}

/// Run a full sync: rebuild, offer pushes, bulk update.
pub fn sync(
    ws: &Workspace,
    settings: &Settings,
    vcs: &dyn Vcs,
    prompter: &mut dyn Prompter,
    options: &SyncOptions,
) -> Result<SyncReport, SyncError> {
    let index = rebuild_index(ws, vcs)?;
    let (unpushed, status_failures) = unpushed_repos(ws, vcs)?;

    let mut pushed = Vec::new();
    let mut push_failures = Vec::new();
    for name in &unpushed {
        let message = format!("'{name}' has unpushed commits. Push now?");
        if !prompter.confirm(&message) {
            continue;
        }
        match vcs.push(&ws.package_dir(name)) {
            Ok(()) => {
                tracing::info!("pushed '{name}'");
                pushed.push(name.clone());
            }
            Err(err) => {
                tracing::warn!("push failed for '{name}': {err}");
                push_failures.push((name.clone(), err.to_string()));
            }
        }
    }

    let args = checkout_args(
        &ws.src_root(),
        options.jobs,
        settings.default_jobs,
        &options.extra_args,
    );
    tracing::info!("running {} update across {} entries", settings.checkout_tool, index.len());
    let status = Command::new(&settings.checkout_tool)
        .args(&args)
        .status()
        .map_err(|e| io_err(&settings.checkout_tool, e))?;

    Ok(SyncReport {
        index_entries: index.len(),
        unpushed,
        pushed,
        push_failures,
        status_failures,
        checkout_status: status.code(),
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};
    use std::fs;
    use std::path::{Path, PathBuf};

    use caravan_core::workspace::Workspace;
    use tempfile::TempDir;

    use crate::git::RepoStatus;
    use crate::prompt::testing::Scripted;

    // Fake accessor keyed by package directory name.
    #[derive(Default)]
    struct FakeVcs {
        remotes: HashMap<String, String>,
        statuses: HashMap<String, RepoStatus>,
        failing_pushes: HashSet<String>,
        pushed: RefCell<Vec<String>>,
    }

    impl FakeVcs {
        fn name_of(dir: &Path) -> String {
            dir.file_name().unwrap().to_string_lossy().into_owned()
        }
    }

    impl Vcs for FakeVcs {
        fn remote_url(&self, dir: &Path) -> Option<String> {
            self.remotes.get(&Self::name_of(dir)).cloned()
        }

        fn status(&self, dir: &Path) -> Result<RepoStatus, SyncError> {
            let name = Self::name_of(dir);
            self.statuses
                .get(&name)
                .copied()
                .ok_or_else(|| SyncError::Git {
                    path: dir.to_path_buf(),
                    message: "no upstream".to_string(),
                })
        }

        fn push(&self, dir: &Path) -> Result<(), SyncError> {
            let name = Self::name_of(dir);
            if self.failing_pushes.contains(&name) {
                return Err(SyncError::PushFailed {
                    package: name,
                    code: Some(1),
                });
            }
            self.pushed.borrow_mut().push(name);
            Ok(())
        }
    }

    fn make_workspace(packages: &[&str]) -> (TempDir, Workspace) {
        let tmp = TempDir::new().expect("tempdir");
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).expect("mkdir src");
        fs::write(src.join(".rosinstall"), "[]\n").expect("seed index");
        for name in packages {
            let dir = src.join(name);
            fs::create_dir_all(dir.join(".git")).expect("mkdir package");
            fs::write(
                dir.join("package.xml"),
                format!("<package>\n  <name>{name}</name>\n</package>\n"),
            )
            .expect("manifest");
        }
        let ws = Workspace::discover_at(tmp.path()).expect("discover");
        (tmp, ws)
    }

    fn ahead(n: u32) -> RepoStatus {
        RepoStatus { ahead: n, behind: 0, dirty: false }
    }

    fn test_settings(tool: &str) -> Settings {
        Settings {
            checkout_tool: tool.to_string(),
            ..Settings::default()
        }
    }

    #[test]
    fn unpushed_set_is_exactly_the_ahead_repos() {
        let (_tmp, ws) = make_workspace(&["a", "b"]);
        let mut vcs = FakeVcs::default();
        vcs.statuses.insert("a".to_string(), ahead(2));
        vcs.statuses.insert("b".to_string(), ahead(0));

        let (unpushed, failures) = unpushed_repos(&ws, &vcs).expect("unpushed");
        assert_eq!(unpushed, vec!["a"]);
        assert!(failures.is_empty());
    }

    #[test]
    fn status_failure_is_reported_and_skipped() {
        let (_tmp, ws) = make_workspace(&["a", "b"]);
        let mut vcs = FakeVcs::default();
        vcs.statuses.insert("b".to_string(), ahead(1));
        // "a" has no status entry and errors.

        let (unpushed, failures) = unpushed_repos(&ws, &vcs).expect("unpushed");
        assert_eq!(unpushed, vec!["b"]);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "a");
    }

    #[test]
    fn rebuild_omits_packages_without_remote() {
        let (_tmp, ws) = make_workspace(&["a", "b"]);
        let mut vcs = FakeVcs::default();
        vcs.remotes.insert("a".to_string(), "git@h:t/a.git".to_string());

        let index = rebuild_index(&ws, &vcs).expect("rebuild");
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("a").unwrap().uri, "git@h:t/a.git");

        let reloaded = Index::load(&ws.src_root()).expect("load");
        assert_eq!(reloaded, index, "rebuild must persist");
    }

    #[test]
    fn rebuild_drops_stale_entries_for_deleted_packages() {
        let (_tmp, ws) = make_workspace(&["kept"]);
        fs::write(
            ws.index_path(),
            "- git:\n    local-name: deleted_by_hand\n    uri: git@h:t/x.git\n",
        )
        .expect("seed stale index");
        let mut vcs = FakeVcs::default();
        vcs.remotes.insert("kept".to_string(), "git@h:t/kept.git".to_string());

        let index = rebuild_index(&ws, &vcs).expect("rebuild");
        assert!(index.get("deleted_by_hand").is_none());
        assert!(index.get("kept").is_some());
    }

    #[test]
    fn default_jobs_hint_is_appended() {
        let args = checkout_args(Path::new("/ws/src"), None, 10, &[]);
        assert_eq!(args.last().unwrap(), &OsString::from("-j10"));
        assert_eq!(args[0], OsString::from("update"));
        assert_eq!(args[1], OsString::from("-t"));
        assert_eq!(args[2], OsString::from("/ws/src"));
    }

    #[test]
    fn explicit_jobs_overrides_default() {
        let args = checkout_args(Path::new("/ws/src"), Some(4), 10, &[]);
        assert_eq!(args.last().unwrap(), &OsString::from("-j4"));
    }

    #[test]
    fn caller_supplied_j_flag_suppresses_the_hint() {
        let extra = vec!["-j3".to_string(), "--verbose".to_string()];
        let args = checkout_args(Path::new("/ws/src"), None, 10, &extra);
        let flat: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(flat, vec!["update", "-t", "/ws/src", "-j3", "--verbose"]);
    }

    #[test]
    fn declining_the_push_still_runs_the_bulk_update() {
        let (_tmp, ws) = make_workspace(&["a"]);
        let mut vcs = FakeVcs::default();
        vcs.remotes.insert("a".to_string(), "git@h:t/a.git".to_string());
        vcs.statuses.insert("a".to_string(), ahead(2));

        let mut prompter = Scripted::new(&[false], &[]);
        let report = sync(
            &ws,
            &test_settings("true"),
            &vcs,
            &mut prompter,
            &SyncOptions::default(),
        )
        .expect("sync");

        assert_eq!(report.unpushed, vec!["a"]);
        assert!(report.pushed.is_empty());
        assert!(vcs.pushed.borrow().is_empty());
        assert_eq!(report.checkout_status, Some(0));
        assert!(report.success());
    }

    #[test]
    fn one_failed_push_does_not_block_the_next() {
        let (_tmp, ws) = make_workspace(&["a", "b"]);
        let mut vcs = FakeVcs::default();
        for name in ["a", "b"] {
            vcs.remotes.insert(name.to_string(), format!("git@h:t/{name}.git"));
            vcs.statuses.insert(name.to_string(), ahead(1));
        }
        vcs.failing_pushes.insert("a".to_string());

        let mut prompter = Scripted::new(&[true, true], &[]);
        let report = sync(
            &ws,
            &test_settings("true"),
            &vcs,
            &mut prompter,
            &SyncOptions::default(),
        )
        .expect("sync");

        assert_eq!(report.push_failures.len(), 1);
        assert_eq!(report.push_failures[0].0, "a");
        assert_eq!(report.pushed, vec!["b"]);
        assert!(!report.success(), "a failed push fails the run");
    }

    #[test]
    fn failing_checkout_tool_surfaces_its_exit_code() {
        let (_tmp, ws) = make_workspace(&["a"]);
        let mut vcs = FakeVcs::default();
        vcs.remotes.insert("a".to_string(), "git@h:t/a.git".to_string());
        vcs.statuses.insert("a".to_string(), ahead(0));

        let mut prompter = Scripted::new(&[], &[]);
        let report = sync(
            &ws,
            &test_settings("false"),
            &vcs,
            &mut prompter,
            &SyncOptions::default(),
        )
        .expect("sync");

        assert_eq!(report.checkout_status, Some(1));
        assert!(!report.success());
    }
}
