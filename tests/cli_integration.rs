//! CLI integration tests for Santa
//!
//! These tests drive the binary end to end: config discovery, the pairing
//! run, pairings persistence, and single-instance locking. Every invocation
//! passes an explicit PID file inside its own temp directory so parallel
//! tests never contend on the default lock path.

use predicates::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use santa_cli::storage::{PairingStore, PidLock};
use santa_cli::Roster;

/// Get a command instance for the santa binary
fn santa_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("santa"))
}

/// The sample family roster with solvable exclusions
const FAMILY_CONFIG: &str = r#"
max_tries = 100
send_email = false

[[participants]]
name = "Joe"
email = "joe_blow@example.com"
exclude = "Holly"

[[participants]]
name = "Holly"
email = "holly_hobby@example.com"
exclude = "Joe, Jane"

[[participants]]
name = "Jane"
email = "jane_doe@example.com"
exclude = "Peter"

[[participants]]
name = "Peter"
email = "peter_piper@example.com"
exclude = "Jane"
"#;

/// Writes a config into the temp dir and returns its path
fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("santa.toml");
    fs::write(&path, content).unwrap();
    path
}

fn pid_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("santa.pid")
}

fn read_pairings(path: &Path) -> BTreeMap<String, String> {
    toml::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn family_roster(config_path: &Path) -> Roster {
    let content = fs::read_to_string(config_path).unwrap();
    let config: santa_cli::storage::Config = toml::from_str(&content).unwrap();
    config.roster().unwrap()
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_genconfig_prints_parseable_sample() {
    let output = santa_cmd().arg("--genconfig").assert().success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    let config: santa_cli::storage::Config = toml::from_str(&stdout).unwrap();
    assert_eq!(config.roster().unwrap().len(), 4);
}

#[test]
fn test_genconfig_output_runs_end_to_end() {
    let dir = TempDir::new().unwrap();

    let output = santa_cmd().arg("--genconfig").assert().success();
    let sample = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    let config_path = write_config(&dir, &sample);

    santa_cmd()
        .args(["-c", config_path.to_str().unwrap()])
        .args(["-p", pid_path(&dir).to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Assigned pairings for 4"));
}

#[test]
fn test_missing_config_fails() {
    santa_cmd()
        .args(["-c", "/definitely/not/here.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no configuration found"));
}

#[test]
fn test_malformed_config_fails() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, "max_tries = \"many\"");

    santa_cmd()
        .args(["-c", config_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn test_empty_roster_fails() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, "max_tries = 5");

    santa_cmd()
        .args(["-c", config_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid roster"));
}

#[test]
fn test_config_via_env_var() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, FAMILY_CONFIG);

    santa_cmd()
        .env("SANTA_CONFIG", config_path.to_str().unwrap())
        .args(["-p", pid_path(&dir).to_str().unwrap()])
        .assert()
        .success();
}

// =============================================================================
// Pairing Run Tests
// =============================================================================

#[test]
fn test_run_writes_valid_pairings_file() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, FAMILY_CONFIG);
    let pairings_path = dir.path().join("pairings.toml");

    santa_cmd()
        .args(["-c", config_path.to_str().unwrap()])
        .args(["-p", pid_path(&dir).to_str().unwrap()])
        .args(["-w", pairings_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote pairings"));

    let pairings = read_pairings(&pairings_path);
    let roster = family_roster(&config_path);

    // Bijection over the roster
    assert_eq!(pairings.len(), 4);
    let mut recipients: Vec<&String> = pairings.values().collect();
    recipients.sort();
    recipients.dedup();
    assert_eq!(recipients.len(), 4);

    // No self-assignments, no excluded picks
    for (giver, recipient) in &pairings {
        assert_ne!(giver, recipient);
        assert!(!roster.get(giver).unwrap().excludes(recipient));
    }
}

#[test]
fn test_pairings_file_round_trips_through_store() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, FAMILY_CONFIG);
    let pairings_path = dir.path().join("pairings.toml");

    santa_cmd()
        .args(["-c", config_path.to_str().unwrap()])
        .args(["-p", pid_path(&dir).to_str().unwrap()])
        .args(["-w", pairings_path.to_str().unwrap()])
        .assert()
        .success();

    let store = PairingStore::new(&pairings_path);
    let pairing = store.read().unwrap();
    store.write(&pairing).unwrap();
    assert_eq!(store.read().unwrap(), pairing);
}

#[test]
fn test_forced_pick_is_honored() {
    // Joe excludes everyone but Jane, so Joe's pick is forced
    let dir = TempDir::new().unwrap();
    let config_path = write_config(
        &dir,
        r#"
max_tries = 100
send_email = false

[[participants]]
name = "Joe"
email = "joe@example.com"
exclude = "Holly, Peter"

[[participants]]
name = "Holly"
email = "holly@example.com"

[[participants]]
name = "Jane"
email = "jane@example.com"

[[participants]]
name = "Peter"
email = "peter@example.com"
"#,
    );
    let pairings_path = dir.path().join("pairings.toml");

    santa_cmd()
        .args(["-c", config_path.to_str().unwrap()])
        .args(["-p", pid_path(&dir).to_str().unwrap()])
        .args(["-w", pairings_path.to_str().unwrap()])
        .assert()
        .success();

    let pairings = read_pairings(&pairings_path);
    assert_eq!(pairings["Joe"], "Jane");
}

#[test]
fn test_exhausted_retries_fail_without_output() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(
        &dir,
        r#"
max_tries = 3
send_email = false

[[participants]]
name = "A"
email = "a@example.com"
exclude = "B"

[[participants]]
name = "B"
email = "b@example.com"
exclude = "A"
"#,
    );
    let pairings_path = dir.path().join("pairings.toml");

    santa_cmd()
        .args(["-c", config_path.to_str().unwrap()])
        .args(["-p", pid_path(&dir).to_str().unwrap()])
        .args(["-w", pairings_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to find a complete pairing"))
        .stderr(predicate::str::contains("3 attempt(s)"));

    assert!(!pairings_path.exists());
}

#[test]
fn test_no_circles_flag_makes_two_person_roster_unsolvable() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(
        &dir,
        r#"
max_tries = 10
send_email = false

[[participants]]
name = "A"
email = "a@example.com"

[[participants]]
name = "B"
email = "b@example.com"
"#,
    );

    // Solvable without the flag (A and B draw each other)
    santa_cmd()
        .args(["-c", config_path.to_str().unwrap()])
        .args(["-p", pid_path(&dir).to_str().unwrap()])
        .assert()
        .success();

    // The -C flag forbids exactly that circle
    santa_cmd()
        .args(["-c", config_path.to_str().unwrap()])
        .args(["-p", pid_path(&dir).to_str().unwrap()])
        .arg("-C")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no valid pairing"));
}

// =============================================================================
// Locking and Output Tests
// =============================================================================

#[test]
fn test_second_instance_exits_cleanly_while_locked() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, FAMILY_CONFIG);
    let pairings_path = dir.path().join("pairings.toml");
    let pid = pid_path(&dir);

    let _held = PidLock::acquire(&pid).unwrap().unwrap();

    santa_cmd()
        .args(["-c", config_path.to_str().unwrap()])
        .args(["-p", pid.to_str().unwrap()])
        .args(["-w", pairings_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    // Nothing was written while the lock was held
    assert!(!pairings_path.exists());
}

#[test]
fn test_quiet_mode_prints_nothing_on_success() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, FAMILY_CONFIG);

    santa_cmd()
        .args(["-c", config_path.to_str().unwrap()])
        .args(["-p", pid_path(&dir).to_str().unwrap()])
        .arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_json_format_emits_json_envelopes() {
    let dir = TempDir::new().unwrap();
    let config_path = write_config(&dir, FAMILY_CONFIG);

    let output = santa_cmd()
        .args(["-c", config_path.to_str().unwrap()])
        .args(["-p", pid_path(&dir).to_str().unwrap()])
        .args(["--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    for line in stdout.lines() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["success"], true);
    }
}

#[test]
fn test_verbose_and_quiet_conflict() {
    santa_cmd().args(["-v", "-q"]).assert().failure();
}
