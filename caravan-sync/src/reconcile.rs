//! The reconciliation pass: three sources of truth, one auditable fix
//! workflow.
//!
//! For every package under the source root the pass probes the workspace
//! index, the manifest, and the local git remote, classifies the
//! divergence, and — only with operator confirmation — rewrites the
//! manifest. Discovered remote URLs are staged into the index regardless
//! of what the operator decides about manifests, and the index is written
//! exactly once at the end.
//!
//! Interruption between manifest fixes and the index write is safe:
//! rewritten manifests reclassify as `Consistent` on the next run, so the
//! pass is at-least-once re-runnable.

use caravan_core::index::Index;
use caravan_core::manifest::ManifestDoc;
use caravan_core::workspace::Workspace;

use caravan_detector::{classify, probe, DivergenceCase};

use crate::diff::unified_preview;
use crate::error::SyncError;
use crate::prompt::Prompter;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// What was done to one manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixAction {
    /// Stale URL replaced with the git remote's.
    UrlReplaced,
    /// Missing (or ambiguous) URL populated from the git remote.
    UrlInserted,
    /// Orphaned URL declaration removed.
    UrlRemoved,
}

/// One applied manifest fix, with the exact change as a unified diff.
#[derive(Debug, Clone)]
pub struct FixRecord {
    pub package: String,
    pub action: FixAction,
    pub preview: String,
}

/// Outcome of a full reconciliation pass.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Packages whose manifest and git remote already agree.
    pub consistent: Vec<String>,
    /// Applied manifest fixes.
    pub fixed: Vec<FixRecord>,
    /// Fixes the operator declined.
    pub declined: Vec<String>,
    /// Packages without any version control — informational.
    pub untracked: Vec<String>,
    /// Packages skipped because their manifest could not be read, with the
    /// reason.
    pub failed: Vec<(String, String)>,
    /// Index entries added or updated during the pass.
    pub index_updates: usize,
    /// Whether the final index write succeeded. A pass only returns `Ok`
    /// with this set; it is carried for symmetry with serialized reports.
    pub index_written: bool,
}

// ---------------------------------------------------------------------------
// The pass
// ---------------------------------------------------------------------------

/// Run a reconciliation pass over every package in the workspace.
///
/// Per-package failures land in the report; only workspace-level problems
/// (enumeration, the final index write) propagate as errors.
pub fn reconcile(ws: &Workspace, prompter: &mut dyn Prompter) -> Result<ReconcileReport, SyncError> {
    let mut index = Index::load(&ws.src_root())?;
    let mut report = ReconcileReport::default();

    for name in ws.package_names()? {
        let entry = match probe(ws, &index, &name) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("{name}: skipped — {err}");
                report.failed.push((name.clone(), err.to_string()));
                continue;
            }
        };

        match classify(&entry) {
            DivergenceCase::Consistent => report.consistent.push(name.clone()),

            DivergenceCase::ManifestStale {
                manifest_url,
                remote_url,
            } => {
                let message = format!(
                    "{name}: manifest URL differs from the git remote\n  manifest: {manifest_url}\n  git repo: {remote_url}\nReplace the URL in the manifest with the git remote's?"
                );
                if prompter.confirm(&message) {
                    let record = rewrite_url(ws, &name, &remote_url, FixAction::UrlReplaced, prompter)?;
                    report.fixed.push(record);
                } else {
                    report.declined.push(name.clone());
                }
            }

            DivergenceCase::ManifestMissing { remote_url } => {
                let message = format!(
                    "{name}: no (or ambiguous) URL declared in the manifest, but the git remote is {remote_url}\nInsert the git remote's URL into the manifest?"
                );
                if prompter.confirm(&message) {
                    let record = rewrite_url(ws, &name, &remote_url, FixAction::UrlInserted, prompter)?;
                    report.fixed.push(record);
                } else {
                    report.declined.push(name.clone());
                }
            }

            DivergenceCase::ManifestOrphaned { manifest_url } => {
                let message = format!(
                    "{name}: manifest declares {manifest_url}, but the package is not a git checkout\nRemove the URL from the manifest?"
                );
                if prompter.confirm(&message) {
                    let record = remove_urls(ws, &name)?;
                    report.fixed.push(record);
                } else {
                    report.declined.push(name.clone());
                }
            }

            DivergenceCase::Untracked => {
                tracing::info!("{name}: not under version control");
                report.untracked.push(name.clone());
            }
        }

        // Index staging is unconditional on discovery: whatever the operator
        // decided about the manifest, the checkout's remote is the truth the
        // checkout tool needs.
        if let Some(url) = &entry.local_remote_url {
            if index.upsert(&name, url) {
                report.index_updates += 1;
            }
        }
    }

    index.write(&ws.src_root())?;
    report.index_written = true;
    Ok(report)
}

/// Drop every URL element and insert `url` at an operator-chosen line.
fn rewrite_url(
    ws: &Workspace,
    name: &str,
    url: &str,
    action: FixAction,
    prompter: &mut dyn Prompter,
) -> Result<FixRecord, SyncError> {
    let mut doc = ManifestDoc::load(&ws.manifest_path(name))?;
    let before = doc.render();

    doc.clear_urls();
    let line = prompter.pick_line(
        &format!("{name}: line to insert the URL at"),
        doc.lines(),
    );
    doc.insert_url(url, line);
    doc.save()?;

    Ok(FixRecord {
        package: name.to_string(),
        action,
        preview: unified_preview(&format!("src/{name}/package.xml"), &before, &doc.render()),
    })
}

/// Drop every URL element.
fn remove_urls(ws: &Workspace, name: &str) -> Result<FixRecord, SyncError> {
    let mut doc = ManifestDoc::load(&ws.manifest_path(name))?;
    let before = doc.render();
    doc.clear_urls();
    doc.save()?;

    Ok(FixRecord {
        package: name.to_string(),
        action: FixAction::UrlRemoved,
        preview: unified_preview(&format!("src/{name}/package.xml"), &before, &doc.render()),
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
