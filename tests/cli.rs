use assert_cmd::prelude::*;
use predicates::str::contains;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

// `workerpool-demo` with no args should run 100 jobs and report 3 errors
#[test]
fn cli_default_run() {
    Command::cargo_bin("workerpool-demo")
        .unwrap()
        .assert()
        .success()
        .stdout(contains("Started 100 jobs"))
        .stdout(contains("with 3 errors"));
}

// `workerpool-demo -V` should print the version
#[test]
fn cli_version() {
    Command::cargo_bin("workerpool-demo")
        .unwrap()
        .args(["-V"])
        .assert()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_json_summary() {
    Command::cargo_bin("workerpool-demo")
        .unwrap()
        .args(["--jobs", "30", "--workers", "4", "--fail", "1,2,29", "--json"])
        .assert()
        .success()
        .stdout(contains(r#""jobs":30"#))
        .stdout(contains(r#""workers":4"#))
        .stdout(contains(r#""errors":3"#))
        .stdout(contains(r#""failed_ids":[1,2,29]"#));
}

// Non-positive worker counts should fall back to 2
#[test]
fn cli_negative_workers() {
    Command::cargo_bin("workerpool-demo")
        .unwrap()
        .args(["--jobs", "10", "--workers", "-3", "--json"])
        .assert()
        .success()
        .stdout(contains(r#""workers":2"#))
        .stdout(contains(r#""errors":0"#));
}

#[test]
fn cli_debug_prints_progress() {
    Command::cargo_bin("workerpool-demo")
        .unwrap()
        .args(["--jobs", "3", "--workers", "1", "--debug"])
        .assert()
        .success()
        .stdout(contains(">> Worker 0 started job 2"))
        .stdout(contains(">> Worker 0 finished job 2"));
}

#[test]
fn cli_config_file() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    let config = temp_dir.path().join("pool.json");
    fs::write(&config, r#"{"workers": 3}"#).unwrap();

    Command::cargo_bin("workerpool-demo")
        .unwrap()
        .args(["--jobs", "60", "--json", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(contains(r#""workers":3"#))
        .stdout(contains(r#""errors":3"#));
}

#[test]
fn cli_invalid_config_file() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    let config = temp_dir.path().join("pool.json");
    fs::write(&config, "not json").unwrap();

    Command::cargo_bin("workerpool-demo")
        .unwrap()
        .args(["--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(contains("Serde error"));
}

#[test]
fn cli_invalid_arg() {
    Command::cargo_bin("workerpool-demo")
        .unwrap()
        .args(["--jobs", "many"])
        .assert()
        .failure();
}
