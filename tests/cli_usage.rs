//! Exit-code contract of the batch-apply command, checked through the
//! compiled binary. A missing, unreadable, or malformed config file is a
//! usage problem: the syntax message is shown and the exit code is 2.

use std::fs;
use std::process::Command;

fn artifactl() -> Command {
    Command::new(env!("CARGO_BIN_EXE_artifactl"))
}

#[test]
fn apply_without_config_file_exits_with_usage_code() {
    let output = artifactl().arg("apply").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("top-level sections"));
}

#[test]
fn missing_config_file_gets_the_syntax_message_and_usage_exit() {
    let output = artifactl()
        .args(["apply", "-c", "/nonexistent/artConfig.json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("top-level sections"));
}

#[test]
fn unreadable_config_file_gets_the_syntax_message_and_usage_exit() {
    // a directory path exists but cannot be read as a file
    let dir = tempfile::tempdir().unwrap();
    let output = artifactl()
        .args(["apply", "-c"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("top-level sections"));
}

#[test]
fn malformed_config_file_gets_the_syntax_message_and_usage_exit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("artConfig.json");
    fs::write(&path, "{ not json").unwrap();

    let output = artifactl().args(["apply", "-c"]).arg(&path).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("artifactl apply started."));
    assert!(stdout.contains("top-level sections"));
}
