#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn readiness(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("readiness").expect("binary should compile");
    cmd.env("HOME", home.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn dimensions_lists_every_id_with_weight() {
    let home = TempDir::new().expect("temp dir should be created");
    readiness(&home)
        .arg("dimensions")
        .assert()
        .success()
        .stdout(predicate::str::contains("security"))
        .stdout(predicate::str::contains("weight 3"))
        .stdout(predicate::str::contains("team_readiness"));
}

#[test]
fn assess_missing_path_emits_error_document_and_exit_2() {
    let home = TempDir::new().expect("temp dir should be created");
    let missing = home.path().join("does-not-exist");
    readiness(&home)
        .arg("assess")
        .arg(&missing)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"error\""))
        .stdout(predicate::str::contains("dimension_scores").not())
        .stderr(predicate::str::contains("path does not exist"));
}

#[test]
fn assess_rejects_unknown_format() {
    let home = TempDir::new().expect("temp dir should be created");
    readiness(&home)
        .arg("assess")
        .arg(".")
        .arg("--format")
        .arg("sarif")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn assess_with_broken_config_is_runtime_failure() {
    let home = TempDir::new().expect("temp dir should be created");
    let config = home.path().join("broken.toml");
    fs::write(&config, "[execution\nworkers = ").expect("config should write");

    readiness(&home)
        .arg("assess")
        .arg(home.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("config parse error"));
}

#[test]
fn assess_rejects_zero_analyzer_timeout() {
    let home = TempDir::new().expect("temp dir should be created");
    readiness(&home)
        .arg("assess")
        .arg(home.path())
        .arg("--analyzer-timeout")
        .arg("0")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("analyzer_timeout_secs"));
}

#[test]
fn assess_writes_file_and_prints_summary() {
    let home = TempDir::new().expect("temp dir should be created");
    let repo = TempDir::new().expect("temp dir should be created");
    fs::write(repo.path().join("README.md"), "# demo\n").expect("readme should write");
    let out = home.path().join("report.md");

    readiness(&home)
        .arg("assess")
        .arg(repo.path())
        .arg("-o")
        .arg(&out)
        .arg("-f")
        .arg("md")
        .assert()
        .success()
        .stdout(predicate::str::contains("Report saved to:"))
        .stdout(predicate::str::contains("Readiness Level:"));

    let written = fs::read_to_string(&out).expect("report should be written");
    assert!(written.starts_with("# Production Readiness Assessment Report"));
    assert!(written.contains("## Dimension Scores"));
}

#[test]
fn render_missing_input_is_runtime_failure() {
    let home = TempDir::new().expect("temp dir should be created");
    readiness(&home)
        .arg("render")
        .arg(home.path().join("nope.json"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("path does not exist"));
}

#[test]
fn render_rejects_non_report_json() {
    let home = TempDir::new().expect("temp dir should be created");
    let input = home.path().join("other.json");
    fs::write(&input, r#"{"name": "not a report"}"#).expect("input should write");

    readiness(&home)
        .arg("render")
        .arg(&input)
        .arg("-o")
        .arg(home.path().join("out.md"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("report parse error"));
}
