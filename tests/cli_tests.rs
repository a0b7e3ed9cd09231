//! Tests for the dexscrape binary: exit codes, `--init`, and a full run.
//!
//! The binary is started in a temp dir so `./config/dexscrape.toml` and the
//! default output file never touch the repository.

mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use common::fixtures::load_fixture;
use common::wiremock_helpers::mount_entry_page;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use wiremock::MockServer;

fn dexscrape() -> assert_cmd::Command {
    cargo_bin_cmd!("dexscrape")
}

#[test]
fn test_missing_input_file_exits_nonzero() {
    let tmp = TempDir::new().unwrap();

    dexscrape()
        .current_dir(tmp.path())
        .args(["run", "no_such_file.txt", "--delay-ms", "0"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no_such_file.txt"));

    assert!(!tmp.path().join("processed_output.md").exists());
}

#[test]
fn test_no_command_exits_nonzero() {
    let tmp = TempDir::new().unwrap();

    dexscrape()
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no command given"));
}

#[test]
fn test_init_writes_default_config() {
    let tmp = TempDir::new().unwrap();

    dexscrape()
        .current_dir(tmp.path())
        .arg("--init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created default configuration file"));

    let written = fs::read_to_string(tmp.path().join("config").join("dexscrape.toml")).unwrap();
    assert!(written.contains("[http]"));
    assert!(written.contains("request_delay_ms"));
}

#[test]
fn test_invalid_config_file_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("broken.toml");
    fs::write(&config_path, "[http\nbase_url = ").unwrap();
    fs::write(tmp.path().join("names.txt"), "Pinsir\n").unwrap();

    dexscrape()
        .current_dir(tmp.path())
        .arg("--config")
        .arg(&config_path)
        .args(["run", "names.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_empty_input_still_exits_zero() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("names.txt"), "\n  \n").unwrap();

    dexscrape()
        .current_dir(tmp.path())
        .args(["run", "names.txt", "out.md", "--delay-ms", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully processed 0/0 entries"));

    assert_eq!(fs::read_to_string(tmp.path().join("out.md")).unwrap(), "");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_run_against_mock_wiki() {
    let server = MockServer::start().await;
    mount_entry_page(&server, "Pinsir", &load_fixture("pinsir.html")).await;

    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("names.txt"), "Pinsir\nGhost\n").unwrap();

    let base_url = server.uri();
    let workdir = tmp.path().to_path_buf();
    let assert = tokio::task::spawn_blocking(move || {
        dexscrape()
            .current_dir(&workdir)
            .args(["run", "names.txt", "--delay-ms", "0", "--base-url", &base_url])
            .assert()
    })
    .await
    .unwrap();

    // A 404 for one entry is not a fatal error
    assert
        .success()
        .stdout(predicate::str::contains("Successfully processed 1/2 entries"));

    let written = fs::read_to_string(tmp.path().join("processed_output.md")).unwrap();
    assert!(written.starts_with("Pinsir\nURL: "));
    assert!(written.contains("Final: Pinsir: Stag Beetle | カイロス (Pokedex #0127)\n\n"));
    assert!(written.ends_with("\n\n"));
    assert!(written.contains("ERROR: could not fetch Ghost: HTTP status 404"));
}
