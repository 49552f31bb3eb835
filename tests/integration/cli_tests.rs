use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn dupsweep(args: &[&str], root: Option<&Path>) -> Output {
    let binary = env!("CARGO_BIN_EXE_dupsweep");
    let mut cmd = Command::new(binary);
    cmd.args(args).env_remove("RUST_LOG").env("DUPSWEEP_EXTENSIONS", "txt|jpg");
    if let Some(root) = root {
        cmd.arg(root);
    }
    cmd.output().expect("run dupsweep")
}

#[test]
fn cli_version_exits_zero() {
    let output = dupsweep(&["-v"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.starts_with(&format!("version {}_rustc_", env!("CARGO_PKG_VERSION"))),
        "unexpected version line: {stdout}"
    );
}

#[test]
fn cli_missing_roots_is_usage_error() {
    let output = dupsweep(&[], None);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn cli_missing_root_directory_fails() {
    let output = dupsweep(
        &["--no-progress", "/nonexistent/dupsweep/root"],
        None,
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[DS001] Error:"), "stderr={stderr}");
}

#[test]
fn cli_reports_without_removing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "same").unwrap();
    fs::write(dir.path().join("b.txt"), "same").unwrap();
    fs::write(dir.path().join("c.txt"), "diff").unwrap();

    let output = dupsweep(&["--no-progress"], Some(dir.path()));

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("b.txt is a duplicate of"), "stdout={stdout}");
    assert!(
        stdout.contains("Finish, 1 group files has 2 copies, 1 will be deleted"),
        "stdout={stdout}"
    );
    assert!(stdout.contains("Add -r option to remove redundant files."));
    assert!(dir.path().join("b.txt").exists());
}

#[test]
fn cli_remove_deletes_redundant_copies() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "same").unwrap();
    fs::write(dir.path().join("b.txt"), "same").unwrap();

    let output = dupsweep(&["-r", "--no-progress"], Some(dir.path()));

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(": 2 copies ("), "stdout={stdout}");
    assert!(stdout.contains("Deleting copy"), "stdout={stdout}");
    assert!(dir.path().join("a.txt").exists());
    assert!(!dir.path().join("b.txt").exists());
}

#[test]
fn cli_legacy_extension_flag() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.dat"), "same").unwrap();
    fs::write(dir.path().join("b.dat"), "same").unwrap();

    let output = dupsweep(&["-ext=", "-disable-smallhash", "--no-progress"], Some(dir.path()));

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Finish, 1 group files has 2 copies"),
        "stdout={stdout}"
    );
}

#[test]
fn cli_quiet_prints_nothing() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "same").unwrap();
    fs::write(dir.path().join("b.txt"), "same").unwrap();

    let output = dupsweep(&["-q"], Some(dir.path()));

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn cli_unknown_flag_is_usage_error() {
    let output = dupsweep(&["--no-such-flag"], None);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--no-such-flag"), "stderr={stderr}");
}

#[test]
fn cli_help_exits_zero() {
    let output = dupsweep(&["--help"], None);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"), "stdout={stdout}");
}

#[test]
fn cli_logs_go_to_stderr() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "same").unwrap();
    fs::write(dir.path().join("b.txt"), "same").unwrap();

    let output = dupsweep(&["-v", "--no-progress"], Some(dir.path()));

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Finder configuration"), "stderr={stderr}");
    assert!(!stdout.contains("Finder configuration"), "stdout={stdout}");
    assert!(
        stdout.contains("Finish, 1 group files has 2 copies"),
        "stdout={stdout}"
    );
}
