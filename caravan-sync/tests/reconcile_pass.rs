//! Full reconciliation-pass scenarios, driven through the public API with
//! a scripted prompter.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use caravan_core::index::Index;
use caravan_core::manifest::ManifestDoc;
use caravan_core::workspace::Workspace;
use caravan_sync::{reconcile, Prompter};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Scripted prompter
// ---------------------------------------------------------------------------

struct Scripted {
    answers: VecDeque<bool>,
    lines: VecDeque<usize>,
    seen_messages: Vec<String>,
}

impl Scripted {
    fn new(answers: &[bool], lines: &[usize]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            lines: lines.iter().copied().collect(),
            seen_messages: Vec::new(),
        }
    }
}

impl Prompter for Scripted {
    fn confirm(&mut self, message: &str) -> bool {
        self.seen_messages.push(message.to_string());
        self.answers.pop_front().expect("unexpected confirm")
    }

    fn pick_line(&mut self, _message: &str, _lines: &[String]) -> usize {
        self.lines.pop_front().expect("unexpected pick_line")
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn make_workspace() -> (TempDir, Workspace) {
    let tmp = TempDir::new().expect("tempdir");
    let ws = Workspace::init_at(tmp.path()).expect("init");
    (tmp, ws)
}

fn seed_package(src: &Path, name: &str, urls: &[&str], remote: Option<&str>) {
    let dir = src.join(name);
    fs::create_dir_all(&dir).expect("mkdir package");
    let mut manifest = format!("<package>\n  <name>{name}</name>\n");
    for url in urls {
        manifest.push_str(&format!("  <url type=\"repository\">{url}</url>\n"));
    }
    manifest.push_str("</package>\n");
    fs::write(dir.join("package.xml"), manifest).expect("write manifest");

    if let Some(remote) = remote {
        let git = dir.join(".git");
        fs::create_dir_all(&git).expect("mkdir .git");
        fs::write(
            git.join("config"),
            format!("[remote \"origin\"]\n\turl = {remote}\n"),
        )
        .expect("write git config");
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn missing_url_scenario_fixes_manifest_and_index() {
    let (_tmp, ws) = make_workspace();
    seed_package(&ws.src_root(), "foo", &[], Some("git@host:team/foo.git"));

    let mut prompter = Scripted::new(&[true], &[2]);
    let report = reconcile(&ws, &mut prompter).expect("reconcile");

    assert_eq!(report.fixed.len(), 1);
    let doc = ManifestDoc::load(&ws.manifest_path("foo")).expect("load");
    assert_eq!(doc.urls(), vec!["git@host:team/foo.git"], "exactly one URL element");
    assert!(doc
        .lines()
        .iter()
        .any(|l| l == "  <url type=\"repository\">git@host:team/foo.git</url>"));

    let index = Index::load(&ws.src_root()).expect("index");
    assert_eq!(index.get("foo").expect("entry").uri, "git@host:team/foo.git");
}

#[test]
fn untracked_scenario_writes_nothing() {
    let (_tmp, ws) = make_workspace();
    seed_package(&ws.src_root(), "bar", &[], None);
    let manifest_before = fs::read_to_string(ws.manifest_path("bar")).expect("read");

    let mut prompter = Scripted::new(&[], &[]);
    let report = reconcile(&ws, &mut prompter).expect("reconcile");

    assert_eq!(report.untracked, vec!["bar"]);
    assert_eq!(
        manifest_before,
        fs::read_to_string(ws.manifest_path("bar")).expect("read"),
    );
    assert!(Index::load(&ws.src_root()).expect("index").get("bar").is_none());
}

#[test]
fn mixed_pass_isolates_the_broken_manifest() {
    let (_tmp, ws) = make_workspace();
    let src = ws.src_root();
    let broken = src.join("c");
    fs::create_dir_all(&broken).expect("mkdir");
    fs::write(broken.join("package.xml"), "not a manifest at all").expect("write");
    seed_package(&src, "d", &["git@h:t/d.git"], Some("git@h:t/d.git"));

    let mut prompter = Scripted::new(&[], &[]);
    let report = reconcile(&ws, &mut prompter).expect("reconcile");

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "c");
    assert_eq!(report.consistent, vec!["d"]);

    let index = Index::load(&ws.src_root()).expect("index");
    assert_eq!(index.get("d").expect("entry").uri, "git@h:t/d.git");
}

#[test]
fn prompt_messages_name_the_package_and_both_urls() {
    let (_tmp, ws) = make_workspace();
    seed_package(
        &ws.src_root(),
        "nav",
        &["git@h:old/nav.git"],
        Some("git@h:new/nav.git"),
    );

    let mut prompter = Scripted::new(&[false], &[]);
    reconcile(&ws, &mut prompter).expect("reconcile");

    let message = &prompter.seen_messages[0];
    assert!(message.contains("nav"));
    assert!(message.contains("git@h:old/nav.git"));
    assert!(message.contains("git@h:new/nav.git"));
}

#[test]
fn interrupted_pass_is_safe_to_rerun() {
    // Simulate the crash window: manifests fixed but index never written,
    // by fixing through the manifest API directly, then running the pass.
    let (_tmp, ws) = make_workspace();
    seed_package(&ws.src_root(), "foo", &[], Some("git@h:t/foo.git"));

    let mut doc = ManifestDoc::load(&ws.manifest_path("foo")).expect("load");
    doc.insert_url("git@h:t/foo.git", 2);
    doc.save().expect("save");
    assert!(Index::load(&ws.src_root()).expect("index").is_empty());

    let mut prompter = Scripted::new(&[], &[]);
    let report = reconcile(&ws, &mut prompter).expect("reconcile");

    assert_eq!(report.consistent, vec!["foo"], "already-fixed manifest reclassifies clean");
    assert!(report.fixed.is_empty());
    let index = Index::load(&ws.src_root()).expect("index");
    assert_eq!(index.get("foo").expect("entry").uri, "git@h:t/foo.git");
}
