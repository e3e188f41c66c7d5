//! Command-line surface tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vidpress(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vidpress").unwrap();
    cmd.current_dir(dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    vidpress(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compress"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn test_compress_requires_input() {
    let dir = TempDir::new().unwrap();
    vidpress(&dir)
        .arg("compress")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--input"));
}

#[test]
fn test_compress_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    vidpress(&dir)
        .args(["--log-level", "error", "compress", "--input", "missing.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_resolved_configuration_is_logged() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("vidpress.toml"), "[vidpress]\ncodec = \"avc1\"\n").unwrap();
    vidpress(&dir)
        .env("VIDPRESS_SKIP_RATE", "3")
        .args(["--log-level", "debug", "--log-format", "compact"])
        .args(["compress", "--input", "missing.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Loaded configuration from: vidpress.toml"))
        .stderr(predicate::str::contains("Applied 1 environment variable overrides"))
        .stderr(predicate::str::contains("Configuration resolved"))
        .stderr(predicate::str::contains("codec avc1"));
}

#[test]
fn test_unknown_method_is_rejected() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("clip.mp4"), b"data").unwrap();
    vidpress(&dir)
        .args(["compress", "--input", "clip.mp4", "--method", "blur"])
        .assert()
        .failure();
}

#[test]
fn test_inspect_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    vidpress(&dir)
        .args(["--log-level", "error", "inspect", "--input", "clip.mp4", "--format", "xml"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("vidpress.toml"), "[vidpress]\nskip_rate = \"many\"\n").unwrap();
    vidpress(&dir)
        .args(["compress", "--input", "clip.mp4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}
