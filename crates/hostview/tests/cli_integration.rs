//! CLI integration tests for the hostview command-line interface.
//!
//! These tests verify:
//! - Help text is displayed correctly
//! - Command-line and config-file exposure requests reach the plan
//! - Visibility answers and exit statuses
//! - Invalid inputs are rejected with appropriate messages
//!
//! Every test names its config through `--config` or `$HOSTVIEW_CONFIG` so
//! no config file on the machine running the tests is picked up.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command for the hostview binary.
fn hostview() -> Command {
    let mut cmd = Command::cargo_bin("hostview").unwrap();
    cmd.env_remove("HOSTVIEW_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// A temp dir holding `data/secret/key` and an empty config file.
fn setup() -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("data");
    std::fs::create_dir_all(data.join("secret")).unwrap();
    std::fs::write(data.join("secret/key"), "hunter2").unwrap();
    let config = dir.path().join("hostview.toml");
    std::fs::write(&config, "").unwrap();
    (dir, data, config)
}

fn s(path: &Path) -> String {
    path.display().to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_lists_subcommands() {
    hostview()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("visible"))
        .stdout(predicate::str::contains("table"));
}

#[test]
fn test_version_displays() {
    hostview()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hostview"));
}

#[test]
fn test_visible_requires_paths() {
    hostview().arg("visible").assert().failure();
}

#[test]
fn test_invalid_host_fs_rejected() {
    hostview()
        .args(["--host-fs", "sometimes", "plan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sometimes"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Plan Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_plan_from_flags() {
    let (_dir, data, config) = setup();
    let secret = data.join("secret");

    hostview()
        .arg("--config")
        .arg(&config)
        .arg("--rw")
        .arg(&data)
        .arg("--tmpfs")
        .arg(&secret)
        .arg("plan")
        .assert()
        .success()
        .stdout(format!(
            "--bind {} {}\n--tmpfs {}\n",
            s(&data),
            s(&data),
            s(&secret)
        ));
}

#[test]
fn test_plan_flat() {
    let (_dir, data, config) = setup();

    hostview()
        .arg("--config")
        .arg(&config)
        .arg("--ro")
        .arg(&data)
        .arg("--dir")
        .arg(data.join("secret"))
        .args(["plan", "--flat"])
        .assert()
        .success()
        .stdout(format!(
            "--ro-bind {} {} --dir {}\n",
            s(&data),
            s(&data),
            s(&data.join("secret"))
        ));
}

#[test]
fn test_plan_json() {
    let (_dir, data, config) = setup();

    let output = hostview()
        .arg("--config")
        .arg(&config)
        .arg("--ro")
        .arg(&data)
        .args(["--json", "plan"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        plan,
        serde_json::json!([{
            "action": "bind",
            "source": s(&data),
            "dest": s(&data),
            "access": "read-only"
        }])
    );
}

#[test]
fn test_plan_from_config_file() {
    let (dir, data, _) = setup();
    let config = dir.path().join("custom.toml");
    std::fs::write(
        &config,
        format!(
            r#"
[[expose]]
path = "{}"
mode = "read-write"

[[expose]]
path = "{}"
mode = "none"
"#,
            s(&data),
            s(&data.join("secret"))
        ),
    )
    .unwrap();

    hostview()
        .arg("--config")
        .arg(&config)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("--bind {}", s(&data))))
        .stdout(predicate::str::contains(format!(
            "--tmpfs {}",
            s(&data.join("secret"))
        )));
}

#[test]
fn test_plan_from_env_config() {
    let (dir, data, _) = setup();
    let config = dir.path().join("env.toml");
    std::fs::write(
        &config,
        format!("[[expose]]\npath = \"{}\"\nmode = \"read-only\"\n", s(&data)),
    )
    .unwrap();

    hostview()
        .env("HOSTVIEW_CONFIG", &config)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("--ro-bind {}", s(&data))));
}

#[test]
fn test_explicit_config_beats_env() {
    let (dir, data, config) = setup();

    hostview()
        .env("HOSTVIEW_CONFIG", dir.path().join("missing.toml"))
        .arg("--config")
        .arg(&config)
        .arg("--ro")
        .arg(&data)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("--ro-bind {}", s(&data))));
}

#[test]
fn test_missing_env_config_fails() {
    let (dir, _data, _config) = setup();

    hostview()
        .env("HOSTVIEW_CONFIG", dir.path().join("missing.toml"))
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.toml"));
}

#[test]
fn test_plan_denied_paths_dropped() {
    let (_dir, _data, config) = setup();

    hostview()
        .arg("--config")
        .arg(&config)
        .args(["--ro", "/usr", "--rw", "/etc", "plan"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_plan_host_fs() {
    if !Path::new("/usr").is_dir() {
        return;
    }
    let (_dir, _data, config) = setup();

    hostview()
        .arg("--config")
        .arg(&config)
        .args(["--host-fs", "read-only", "plan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--ro-bind /usr /run/host/usr"));
}

#[test]
fn test_missing_config_fails() {
    let (dir, _data, _config) = setup();

    hostview()
        .arg("--config")
        .arg(dir.path().join("missing.toml"))
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load exposure requests"));
}

#[test]
fn test_invalid_config_fails() {
    let (dir, _data, _config) = setup();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[[expose]]\npath = \"relative\"\nmode = \"read-only\"\n").unwrap();

    hostview()
        .arg("--config")
        .arg(&config)
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be absolute"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Visible and Table Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_visible_paths() {
    let (_dir, data, config) = setup();

    hostview()
        .arg("--config")
        .arg(&config)
        .arg("--rw")
        .arg(&data)
        .arg("visible")
        .arg(&data)
        .arg(data.join("secret/key"))
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("visible\t{}", s(&data))));
}

#[test]
fn test_hidden_path_exit_status() {
    let (_dir, data, config) = setup();
    let key = data.join("secret/key");

    hostview()
        .arg("--config")
        .arg(&config)
        .arg("--rw")
        .arg(&data)
        .arg("--tmpfs")
        .arg(data.join("secret"))
        .arg("visible")
        .arg(&data)
        .arg(&key)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(format!("visible\t{}", s(&data))))
        .stdout(predicate::str::contains(format!("hidden\t{}", s(&key))));
}

#[test]
fn test_visible_json() {
    let (_dir, data, config) = setup();

    let output = hostview()
        .arg("--config")
        .arg(&config)
        .args(["--json", "visible"])
        .arg(&data)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        results,
        serde_json::json!([{ "path": s(&data), "visible": false }])
    );
}

#[test]
fn test_table_output() {
    let (_dir, data, config) = setup();
    let secret = data.join("secret");

    hostview()
        .arg("--config")
        .arg(&config)
        .arg("--ro")
        .arg(&data)
        .arg("--tmpfs")
        .arg(&secret)
        .arg("table")
        .assert()
        .success()
        .stdout(format!("read-only\t{}\ntmpfs\t{}\n", s(&data), s(&secret)));
}

#[test]
fn test_table_json() {
    let (_dir, data, config) = setup();

    let output = hostview()
        .arg("--config")
        .arg(&config)
        .arg("--rw")
        .arg(&data)
        .args(["--host-fs", "read-write", "--json", "table"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let table: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(table["host-fs"], "read-write");
    assert_eq!(table["entries"][0]["mode"], "read-write-bind");
    assert_eq!(table["entries"][0]["path"], s(&data));
}
