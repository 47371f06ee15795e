//! # CLI Command Tests
//!
//! Runs the `sheetmeta` binary against a temporary content database.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

/// A command running in `dir`, isolated from any local config or `.env`.
fn sheetmeta(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("sheetmeta").unwrap();
    cmd.current_dir(dir)
        .env_remove("DB_URL")
        .env("RUST_LOG", "info")
        .arg("--db-url")
        .arg(dir.join("db").join("content.db"));
    cmd
}

#[test]
fn test_settings_set_echoes_sanitized_values() {
    // Arrange
    let temp_dir = tempdir().unwrap();

    // Act & Assert
    sheetmeta(temp_dir.path())
        .arg("settings")
        .arg("set")
        .arg("--spreadsheet-id")
        .arg("  sheet-<b>123</b> ")
        .arg("--range")
        .arg("Sheet1!D1:BA2")
        .arg("--front-page")
        .arg("5")
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings saved!"))
        .stdout(predicate::str::contains("Spreadsheet ID: sheet-123"))
        .stdout(predicate::str::contains("Sheet Range: Sheet1!D1:BA2"))
        .stdout(predicate::str::contains("Front page: 5"));
}

#[test]
fn test_settings_show_on_fresh_database() {
    let temp_dir = tempdir().unwrap();

    sheetmeta(temp_dir.path())
        .arg("settings")
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("Front page: (not set)"));
}

#[test]
fn test_sync_without_settings_is_a_logged_no_op() {
    let temp_dir = tempdir().unwrap();

    sheetmeta(temp_dir.path())
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Nothing synced: Spreadsheet ID is not configured.",
        ))
        .stderr(predicate::str::contains("Starting update process."));
}

#[test]
fn test_meta_show_without_front_page() {
    let temp_dir = tempdir().unwrap();

    sheetmeta(temp_dir.path())
        .arg("meta")
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("No front page set."));
}

#[test]
fn test_missing_config_file_fails() {
    let temp_dir = tempdir().unwrap();

    sheetmeta(temp_dir.path())
        .arg("--config")
        .arg("does-not-exist.yml")
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}
