//! Integration tests for the prtimer binary

#![allow(deprecated)] // cargo_bin is the standard way to test CLI binaries

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Command with an isolated (missing) config file
fn prtimer(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("prtimer").unwrap();
    cmd.arg("--config").arg(temp.path().join("config.toml"));
    cmd
}

// =============================================================================
// CLI Tests
// =============================================================================

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("prtimer").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("watches a GitHub pull request"))
        .stdout(predicate::str::contains("--poll-interval"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("prtimer").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_minutes() {
    let mut cmd = Command::cargo_bin("prtimer").unwrap();
    cmd.assert().failure();
}

#[test]
fn test_zero_minutes_rejected() {
    let temp = TempDir::new().unwrap();
    prtimer(&temp)
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid duration"));
}

#[test]
fn test_huge_minutes_rejected() {
    let temp = TempDir::new().unwrap();
    prtimer(&temp)
        .args(["1e12", "https://example.com/docs/page"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid duration"))
        .stderr(predicate::str::contains("panicked").not());
}

#[test]
fn test_current_conflicts_with_link() {
    let temp = TempDir::new().unwrap();
    prtimer(&temp)
        .args(["1", "https://github.com/a/b/pull/1", "--current"])
        .assert()
        .failure();
}

#[test]
fn test_unknown_backend_rejected() {
    let temp = TempDir::new().unwrap();
    prtimer(&temp)
        .args(["1", "--backend", "carrier-pigeon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown backend"));
}

// =============================================================================
// Wait Flow Tests
// =============================================================================

#[test]
fn test_plain_timer_completes() {
    let temp = TempDir::new().unwrap();
    prtimer(&temp)
        .arg("0.001")
        .assert()
        .success()
        .stdout(predicate::str::contains("Timer started"))
        .stdout(predicate::str::contains("Time's up"));
}

#[test]
fn test_non_pr_link_does_not_poll() {
    let temp = TempDir::new().unwrap();
    // Backend that can't run proves no query is attempted
    prtimer(&temp)
        .args(["0.001", "https://example.com/docs/page", "--backend", "api"])
        .env_remove("GITHUB_TOKEN")
        .env_remove("GH_TOKEN")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://example.com/docs/page"))
        .stdout(predicate::str::contains("Time's up"));
}

#[test]
fn test_stdin_without_pr_link() {
    let temp = TempDir::new().unwrap();
    prtimer(&temp)
        .args(["0.001", "-"])
        .write_stdin("build finished, nothing to watch\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Time's up"));
}

#[test]
fn test_invalid_config_rejected() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("config.toml"), "poll_interval_secs = 0\n").unwrap();

    prtimer(&temp)
        .arg("0.001")
        .assert()
        .failure()
        .stderr(predicate::str::contains("poll_interval_secs"));
}

#[test]
fn test_poll_interval_override_validated() {
    let temp = TempDir::new().unwrap();
    prtimer(&temp)
        .args(["0.001", "--poll-interval", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("poll_interval_secs"));
}
