//! End-to-end checks of the binary's precondition handling

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd(source: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dayone-backup").unwrap();
    cmd.env("DAYONE_BACKUP_SOURCE_DIR", source.path())
        .env("DAYONE_BACKUP_CONFIG", source.path().join("config.json"))
        .env_remove("RUST_LOG");
    cmd
}

fn is_empty(dir: &TempDir) -> bool {
    std::fs::read_dir(dir.path()).unwrap().next().is_none()
}

#[test]
fn test_missing_destination_exits_1() {
    let source = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();

    cmd(&source)
        .current_dir(cwd.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Backup starting"))
        .stderr(predicate::str::contains("No destination specified!"));

    assert!(is_empty(&cwd));
}

#[test]
fn test_destination_not_a_directory_exits_1() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();
    let file = dest.path().join("plain-file");
    std::fs::write(&file, b"").unwrap();

    cmd(&source)
        .arg("--dest")
        .arg(&file)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Destination is not a directory"));
}

#[cfg(not(target_os = "macos"))]
#[test]
fn test_unsupported_os_writes_nothing() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();

    cmd(&source)
        .args(["-d", dest.path().to_str().unwrap(), "-n", "Journal", "-m", "3"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Only MacOS supported!"));

    assert!(is_empty(&dest));
}

#[cfg(target_os = "macos")]
#[test]
fn test_missing_source_data_exits_1() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("dayone-backup").unwrap();
    cmd.env("DAYONE_BACKUP_SOURCE_DIR", source.path().join("absent"))
        .args(["-d", dest.path().to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No Dayone2 data found"));

    assert!(is_empty(&dest));
}

#[test]
fn test_zero_retention_rejected() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();

    cmd(&source)
        .args(["-d", dest.path().to_str().unwrap(), "--max_backups", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("max_backups must be at least 1"));

    assert!(is_empty(&dest));
}

#[test]
fn test_non_numeric_retention_exits_1() {
    let source = TempDir::new().unwrap();
    let dest = TempDir::new().unwrap();

    cmd(&source)
        .args(["-d", dest.path().to_str().unwrap(), "-m", "abc"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--max_backups"));

    assert!(is_empty(&dest));
}

#[test]
fn test_version() {
    Command::cargo_bin("dayone-backup")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("dayone-backup"));
}
