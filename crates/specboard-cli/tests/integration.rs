#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Command rooted at `dir`, with HOME and config isolated inside it.
fn specboard(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("specboard").unwrap();
    cmd.current_dir(dir.path())
        .env("SPECBOARD_ROOT", dir.path())
        .env("SPECBOARD_CONFIG", dir.path().join("config.yaml"))
        .env("HOME", dir.path());
    cmd
}

fn init_project(dir: &TempDir) {
    write(
        dir.path(),
        "specs/001-login/spec.md",
        "# Feature Specification: Login\n\n### US1 - Login (P1)\n- renders\n- submits\n",
    );
    write(dir.path(), "specs/001-login/plan.md", "# Plan\n");
    write(
        dir.path(),
        "specs/001-login/tasks.md",
        "## Phase 1\n- [x] T001 [US1] Scaffold\n- [x] T002 [US1] Form\n",
    );
    write(dir.path(), "specs/002-search/spec.md", "# Search\n");
    write(dir.path(), "specs/002-search/checklist.md", "# Gate\n- [ ] reviewed\n");
}

// ---------------------------------------------------------------------------
// scan / feature / metrics
// ---------------------------------------------------------------------------

#[test]
fn scan_lists_features_with_stage() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    specboard(&dir)
        .arg("scan")
        .assert()
        .success()
        .stdout(predicate::str::contains("001-login"))
        .stdout(predicate::str::contains("complete"))
        .stdout(predicate::str::contains("002-search"))
        .stdout(predicate::str::contains("specify"));
}

#[test]
fn scan_json_is_project_snapshot() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let out = specboard(&dir).args(["scan", "--json"]).output().unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["features"][0]["totalTasks"], 2);
    assert_eq!(json["features"][1]["hasChecklists"], true);
}

#[test]
fn scan_outside_project_fails() {
    let dir = TempDir::new().unwrap();
    specboard(&dir)
        .arg("scan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a spec-kit project"));
}

#[test]
fn feature_shows_user_stories() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    specboard(&dir)
        .args(["feature", "001-login"])
        .assert()
        .success()
        .stdout(predicate::str::contains("US1 [P1] Login (2 criteria)"));
}

#[test]
fn unknown_feature_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    specboard(&dir)
        .args(["feature", "999-missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("feature not found: 999-missing"));
}

#[test]
fn metrics_json() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let out = specboard(&dir).args(["metrics", "--json"]).output().unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["totalFeatures"], 2);
    assert_eq!(json["completionPercentage"], 100);
    assert_eq!(json["featuresByStage"]["complete"], 1);
    assert_eq!(json["totalChecklistItems"], 1);
}

// ---------------------------------------------------------------------------
// toggle
// ---------------------------------------------------------------------------

#[test]
fn toggle_checks_and_unchecks() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let file = dir.path().join("specs/002-search/checklist.md");

    specboard(&dir)
        .arg("toggle")
        .arg(&file)
        .arg("1")
        .assert()
        .success()
        .stdout(predicate::str::contains("checked"));
    assert_eq!(std::fs::read_to_string(&file).unwrap(), "# Gate\n- [x] reviewed\n");

    specboard(&dir).arg("toggle").arg(&file).arg("1").assert().success();
    assert_eq!(std::fs::read_to_string(&file).unwrap(), "# Gate\n- [ ] reviewed\n");
}

#[test]
fn toggle_rejects_bad_lines() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let file = dir.path().join("specs/002-search/checklist.md");

    specboard(&dir)
        .arg("toggle")
        .arg(&file)
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid checkbox"));

    specboard(&dir)
        .arg("toggle")
        .arg(&file)
        .arg("-1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of bounds"));
}

// ---------------------------------------------------------------------------
// recent
// ---------------------------------------------------------------------------

#[test]
fn recent_add_list_clear() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    specboard(&dir).args(["recent", "add"]).assert().success();
    assert!(dir.path().join(".specboard/recent.json").exists());

    let out = specboard(&dir).args(["recent", "--json"]).output().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json[0], dir.path().display().to_string());

    specboard(&dir)
        .args(["recent", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No recent projects."));
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn malformed_config_is_reported() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    write(dir.path(), "config.yaml", "debounce_ms: [oops");
    specboard(&dir).arg("scan").assert().failure().stderr(predicate::str::starts_with("error:"));
}
