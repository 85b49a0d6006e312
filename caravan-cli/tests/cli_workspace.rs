//! End-to-end CLI tests that need no git binary and no network.
//!
//! Every test gets its own HOME so `~/.caravan/config.yaml` lands in a
//! TempDir, never in the developer's real home.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn caravan(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("caravan").expect("binary");
    cmd.env("HOME", home.path());
    cmd.env("USERPROFILE", home.path());
    cmd
}

fn seed_package(src: &std::path::Path, name: &str, remote: Option<&str>) {
    let dir = src.join(name);
    std::fs::create_dir_all(&dir).expect("mkdir package");
    std::fs::write(
        dir.join("package.xml"),
        format!("<package>\n  <name>{name}</name>\n</package>\n"),
    )
    .expect("manifest");
    if let Some(remote) = remote {
        let git = dir.join(".git");
        std::fs::create_dir_all(&git).expect("mkdir .git");
        std::fs::write(
            git.join("config"),
            format!("[remote \"origin\"]\n\turl = {remote}\n"),
        )
        .expect("git config");
    }
}

#[test]
fn init_creates_workspace_and_refuses_twice() {
    let home = TempDir::new().expect("home");
    let work = TempDir::new().expect("work");
    let ws = work.path().join("ws");

    caravan(&home)
        .arg("init")
        .arg(&ws)
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized workspace"));
    assert!(ws.join("src").join(".rosinstall").is_file());

    caravan(&home)
        .arg("init")
        .arg(ws.join("nested"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("already inside a workspace"));
}

#[test]
fn index_rebuild_records_detected_remotes() {
    let home = TempDir::new().expect("home");
    let work = TempDir::new().expect("work");
    let ws = work.path().join("ws");

    caravan(&home).arg("init").arg(&ws).assert().success();
    let src = ws.join("src");
    seed_package(&src, "foo", Some("git@host:team/foo.git"));
    seed_package(&src, "bare", None);

    caravan(&home)
        .current_dir(&ws)
        .args(["index", "rebuild"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 entry"));

    let index = std::fs::read_to_string(src.join(".rosinstall")).expect("read index");
    assert!(index.contains("local-name: foo"));
    assert!(index.contains("uri: git@host:team/foo.git"));
    assert!(!index.contains("bare"), "remote-less package must be omitted");
}

#[test]
fn status_json_reports_untracked_package() {
    let home = TempDir::new().expect("home");
    let work = TempDir::new().expect("work");
    let ws = work.path().join("ws");

    caravan(&home).arg("init").arg(&ws).assert().success();
    seed_package(&ws.join("src"), "loose", None);

    caravan(&home)
        .current_dir(&ws)
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"package\": \"loose\""))
        .stdout(predicate::str::contains("\"remote\": null"));
}

#[test]
fn deps_prints_dot_graph() {
    let home = TempDir::new().expect("home");
    let work = TempDir::new().expect("work");
    let ws = work.path().join("ws");

    caravan(&home).arg("init").arg(&ws).assert().success();
    let src = ws.join("src");
    let app = src.join("app");
    std::fs::create_dir_all(&app).expect("mkdir");
    std::fs::write(
        app.join("package.xml"),
        "<package>\n  <name>app</name>\n  <depend>lib_a</depend>\n</package>\n",
    )
    .expect("manifest");
    seed_package(&src, "lib_a", None);

    caravan(&home)
        .current_dir(&ws)
        .arg("deps")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph"))
        .stdout(predicate::str::contains("app"))
        .stdout(predicate::str::contains("lib_a"));
}

#[test]
fn pkg_depend_edits_the_manifest_in_place() {
    let home = TempDir::new().expect("home");
    let work = TempDir::new().expect("work");
    let ws = work.path().join("ws");

    caravan(&home).arg("init").arg(&ws).assert().success();
    seed_package(&ws.join("src"), "app", None);

    caravan(&home)
        .current_dir(&ws)
        .args(["pkg", "depend", "app", "lib_a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("now depends on 'lib_a'"));

    let manifest = std::fs::read_to_string(ws.join("src/app/package.xml")).expect("read");
    assert!(manifest.contains("<depend>lib_a</depend>"));

    // Declaring it again is a clean no-op.
    caravan(&home)
        .current_dir(&ws)
        .args(["pkg", "depend", "app", "lib_a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already depends on"));
}

#[test]
fn commands_outside_a_workspace_fail_cleanly() {
    let home = TempDir::new().expect("home");
    let nowhere = TempDir::new().expect("nowhere");

    caravan(&home)
        .current_dir(nowhere.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not inside a workspace"));
}

#[test]
fn creds_roundtrip_through_file_backend() {
    let home = TempDir::new().expect("home");

    caravan(&home)
        .args(["creds", "save", "dev", "s3cret-token"])
        .assert()
        .success();

    caravan(&home)
        .args(["creds", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Username: dev"))
        .stdout(predicate::str::contains("******"))
        .stdout(predicate::str::contains("s3cret-token").not());

    caravan(&home)
        .args(["creds", "remove"])
        .assert()
        .success();

    caravan(&home)
        .args(["creds", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Username: -"));
}
