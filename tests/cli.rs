//! End-to-end tests of the `perccli-status` binary against a fake perccli
//! shell script serving the JSON fixtures.
#![cfg(unix)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

fn fixture(generation: &str, name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(generation)
        .join(name);
    fs::read_to_string(path).unwrap()
}

fn fixtures(generation: &str) -> [String; 3] {
    [
        fixture(generation, "controllers.json"),
        fixture(generation, "vdisks.json"),
        fixture(generation, "disks.json"),
    ]
}

/// A perccli stand-in living in its own temp directory.
struct FakePerccli {
    _dir: TempDir,
    path: PathBuf,
}

fn write_script(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("perccli64");
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Answer each of the three queries with the given stdout.
fn serving(outputs: &[String; 3]) -> FakePerccli {
    let dir = tempfile::tempdir().unwrap();
    for (name, body) in ["controllers.json", "vdisks.json", "disks.json"].iter().zip(outputs) {
        fs::write(dir.path().join(name), body).unwrap();
    }
    let body = format!(
        "cd '{}'\ncase \"$1\" in\n  /call) cat controllers.json ;;\n  /call/vall) cat vdisks.json ;;\n  /call/eall/sall) cat disks.json ;;\n  *) exit 1 ;;\nesac",
        dir.path().display()
    );
    let path = write_script(&dir, &body);
    FakePerccli { _dir: dir, path }
}

fn running(body: &str) -> FakePerccli {
    let dir  = tempfile::tempdir().unwrap();
    let path = write_script(&dir, body);
    FakePerccli { _dir: dir, path }
}

/// The binary, isolated from the user's config and log settings.
fn plugin_cmd(perccli: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("perccli-status");
    cmd.env("HOME", "/tmp/perccli-status-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/perccli-status-test-nonexistent")
        .env_remove("RUST_LOG")
        .arg("--perccli-path")
        .arg(perccli);
    cmd
}

// ── Exit codes ──────────────────────────────────────────────────────

#[test]
fn healthy_controller_exits_ok() {
    let fake = serving(&fixtures("perccli"));
    plugin_cmd(&fake.path)
        .assert()
        .code(0)
        .stdout(
            predicate::str::starts_with("-- controller info\n")
                .and(predicate::str::contains("PERC H730P Adapter"))
                .and(predicate::str::contains("-- virtual disk info"))
                .and(predicate::str::contains("/c0/v1"))
                .and(predicate::str::contains("-- disk info"))
                .and(predicate::str::contains("/c0/e32/s0")),
        );
}

#[test]
fn nagios_line_for_healthy_controller() {
    let fake = serving(&fixtures("perccli"));
    plugin_cmd(&fake.path)
        .arg("--nagios")
        .assert()
        .code(0)
        .stdout("RAID OK: Arrays {\"Optl\": 2} Disks {\"Onln\": 2}\n");
}

#[test]
fn nagios_line_for_perccli2() {
    let fake = serving(&fixtures("perccli2"));
    plugin_cmd(&fake.path)
        .arg("--nagios")
        .assert()
        .code(0)
        .stdout("RAID OK: Arrays {\"Optl\": 2} Disks {\"Online\": 2}\n");
}

#[test]
fn failed_disk_is_critical() {
    let [ctrls, vds, disks] = fixtures("perccli");
    let disks = disks.replacen("\"State\" : \"Onln\"", "\"State\" : \"Failed\"", 1);
    let fake  = serving(&[ctrls, vds, disks]);
    plugin_cmd(&fake.path)
        .arg("--nagios")
        .assert()
        .code(2)
        .stdout("RAID CRITICAL: Arrays {\"Optl\": 2} Disks {\"Failed\": 1, \"Onln\": 1}\n");
}

#[test]
fn non_json_output_is_critical() {
    let [_, vds, disks] = fixtures("perccli");
    let fake = serving(&["notjson".to_string(), vds, disks]);
    plugin_cmd(&fake.path)
        .assert()
        .code(2)
        .stdout(predicate::str::starts_with(
            "-- controller info\nid | status | model | ram | temp | bbu | firmware\n---+",
        ))
        .stderr(predicate::str::contains("parsing error"));
}

#[test]
fn missing_executable_is_critical() {
    plugin_cmd(Path::new("/nonexistent/perccli64"))
        .arg("--nagios")
        .assert()
        .code(2)
        .stdout("RAID CRITICAL: Arrays {} Disks {}\n")
        .stderr(predicate::str::contains("cannot run perccli"));
}

#[test]
fn failing_tool_is_critical() {
    let fake = running("echo 'controller not found' >&2\nexit 1");
    plugin_cmd(&fake.path)
        .arg("--nagios")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("controller not found"));
}

#[test]
fn hung_tool_times_out() {
    let fake = running("sleep 10");
    plugin_cmd(&fake.path)
        .args(["--nagios", "--timeout", "1"])
        .assert()
        .code(2)
        .stdout("RAID CRITICAL: Arrays {} Disks {}\n")
        .stderr(predicate::str::contains("did not finish"));
}

// ── Flags ───────────────────────────────────────────────────────────

#[test]
fn version_flag() {
    let mut cmd = cargo_bin_cmd!("perccli-status");
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(format!("perccli-status {}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_wins_over_other_flags() {
    let mut cmd = cargo_bin_cmd!("perccli-status");
    cmd.args(["--nagios", "--perccli-path", "/nonexistent", "--version"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("perccli-status "));
}

#[test]
fn debug_does_not_change_output() {
    let fake = serving(&fixtures("perccli"));
    plugin_cmd(&fake.path)
        .args(["--nagios", "--debug"])
        .assert()
        .code(0)
        .stdout("RAID OK: Arrays {\"Optl\": 2} Disks {\"Onln\": 2}\n")
        .stderr(predicate::str::contains("DEBUG"));
}

#[test]
fn config_file_supplies_path() {
    let fake = serving(&fixtures("perccli"));
    let dir  = tempfile::tempdir().unwrap();
    let cfg  = dir.path().join("perccli-status.toml");
    fs::write(&cfg, format!("[perccli]\npath = \"{}\"\n", fake.path.display())).unwrap();

    let mut cmd = cargo_bin_cmd!("perccli-status");
    cmd.env_remove("RUST_LOG")
        .args(["--nagios", "--config"])
        .arg(&cfg)
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("RAID OK:"));
}
