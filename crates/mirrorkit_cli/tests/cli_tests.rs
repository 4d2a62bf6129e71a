use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn run_mirrorkit(sources: &[&Path], backups: &[&Path], flags: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mirrorkit"));
    cmd.args(flags);
    for path in sources {
        cmd.arg("--source").arg(path);
    }
    for path in backups {
        cmd.arg("--backup").arg(path);
    }
    cmd.output().expect("Failed to run mirrorkit")
}

#[test]
fn test_cli_backup_completes() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("photos");
    let bk = tmp.path().join("bk");
    std::fs::create_dir_all(src.join("2024")).unwrap();
    std::fs::create_dir_all(&bk).unwrap();
    std::fs::write(src.join("2024/img.raw"), "raw").unwrap();

    let output = run_mirrorkit(
        &[src.as_path()],
        &[bk.as_path()],
        &["--log-level", "silent"],
    );
    assert!(output.status.success(), "CLI run failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Backup completed"), "Unexpected output: {stdout}");
    assert_eq!(
        std::fs::read_to_string(bk.join("photos/2024/img.raw")).unwrap(),
        "raw"
    );
}

#[test]
fn test_cli_reports_missing_backup_locations() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    std::fs::create_dir_all(&src).unwrap();
    let missing = tmp.path().join("not_there");

    let output = run_mirrorkit(
        &[src.as_path()],
        &[missing.as_path()],
        &["--log-level", "silent"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("backup ignored"), "Unexpected stderr: {stderr}");
    assert!(
        stderr.contains("no backup locations registered"),
        "Unexpected stderr: {stderr}"
    );
    assert!(!missing.exists());
}

#[test]
fn test_cli_without_arguments_fails_on_configuration() {
    let output = run_mirrorkit(&[], &[], &["--log-level", "silent"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("no source directories registered"),
        "Unexpected stderr: {stderr}"
    );
}

#[test]
fn test_cli_dry_run_leaves_backup_untouched() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("src");
    let bk = tmp.path().join("bk");
    std::fs::create_dir_all(&src).unwrap();
    std::fs::create_dir_all(&bk).unwrap();
    std::fs::write(src.join("a.txt"), "a").unwrap();

    let output = run_mirrorkit(
        &[src.as_path()],
        &[bk.as_path()],
        &["--dry-run", "--log-level", "silent"],
    );
    assert!(output.status.success(), "CLI run failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("files=1"), "Unexpected output: {stdout}");
    assert_eq!(std::fs::read_dir(&bk).unwrap().count(), 0);
}
