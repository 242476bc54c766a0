//! Integration tests for the report command line.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Legacy-named photos for one day: three visitations once grouped.
fn legacy_tree() -> TempDir {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("2024-01-15");
    fs::create_dir_all(&dir).unwrap();
    for name in [
        "boxed_2024-01-15_08-00-00_70_house-finch_65.png",
        "boxed_2024-01-15_08-02-00_72_house-finch_60.png",
        "boxed_2024-01-15_08-30-00_75_house-finch_80.png",
        "boxed_2024-01-15_09-00-00_75_american-robin_90.png",
    ] {
        fs::write(dir.join(name), b"png").unwrap();
    }
    root
}

#[test]
fn test_missing_storage_root_fails() {
    let mut cmd = cargo_bin_cmd!("perchwatch");
    cmd.arg("--dir").arg("/nonexistent/perchwatch-photos");

    cmd.assert().failure().stderr(predicate::str::contains(
        "photo storage root does not exist",
    ));
}

#[test]
fn test_report_prints_daily_summary() {
    let root = legacy_tree();

    let mut cmd = cargo_bin_cmd!("perchwatch");
    cmd.arg("--dir").arg(root.path()).arg("--no-progress");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("3 visitations"))
        .stdout(predicate::str::contains("Species: house finch"))
        .stdout(predicate::str::contains(
            "Today I was visited 3 times. 2 visits from house finch. 1 visit from american robin.",
        ));
}

#[test]
fn test_report_writes_summary_json_at_root() {
    let root = legacy_tree();

    let mut cmd = cargo_bin_cmd!("perchwatch");
    cmd.arg("--dir").arg(root.path()).arg("--no-progress");
    cmd.assert().success();

    let summary_path = root.path().join("visitations.json");
    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(summary_path).unwrap()).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 3);
}

#[test]
fn test_report_honors_output_flag() {
    let root = legacy_tree();
    let out_dir = tempfile::tempdir().unwrap();
    let output = out_dir.path().join("reports").join("day.json");

    let mut cmd = cargo_bin_cmd!("perchwatch");
    cmd.arg("--dir")
        .arg(root.path())
        .arg("--output")
        .arg(&output)
        .arg("--no-progress");
    cmd.assert().success();

    assert!(output.exists());
    assert!(!root.path().join("visitations.json").exists());
}

#[test]
fn test_report_date_without_records_is_empty() {
    let root = legacy_tree();

    let mut cmd = cargo_bin_cmd!("perchwatch");
    cmd.arg("--dir")
        .arg(root.path())
        .arg("--date")
        .arg("2024-02-01")
        .arg("--no-progress");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0 visitations"))
        .stdout(predicate::str::contains("No visitations today."));
}

#[test]
fn test_dir_env_variable_selects_root() {
    let root = legacy_tree();

    let mut cmd = cargo_bin_cmd!("perchwatch");
    cmd.env("PERCHWATCH_DIR", root.path()).arg("--no-progress");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Today I was visited 3 times."));
}

#[test]
fn test_config_path_prints_toml_location() {
    let mut cmd = cargo_bin_cmd!("perchwatch");
    cmd.arg("config").arg("path");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("perchwatch"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_invalid_date_is_rejected() {
    let mut cmd = cargo_bin_cmd!("perchwatch");
    cmd.arg("--dir").arg("/tmp").arg("--date").arg("01-15-2024");

    cmd.assert().failure();
}
