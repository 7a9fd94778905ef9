// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tokio::process::Command;

#[tokio::test]
async fn run_with_timeout_success() {
    let mut cmd = Command::new("echo");
    cmd.arg("hello");
    let output = run_with_timeout(cmd, Some(Duration::from_secs(5)), "echo")
        .await
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hello");
}

#[tokio::test]
async fn run_without_timeout_waits_for_completion() {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", "sleep 0.1; echo done"]);
    let output = run_with_timeout(cmd, None, "sleep").await.unwrap();
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "done");
}

#[tokio::test]
async fn run_with_timeout_nonzero_exit_is_not_an_error() {
    let cmd = Command::new("false");
    let output = run_with_timeout(cmd, Some(Duration::from_secs(5)), "false")
        .await
        .unwrap();
    assert!(!output.status.success());
}

#[tokio::test]
async fn run_with_timeout_io_error() {
    let cmd = Command::new("/nonexistent/binary");
    let result = run_with_timeout(cmd, None, "nonexistent").await;
    let err = result.unwrap_err();
    assert!(err.starts_with("nonexistent failed:"), "got: {}", err);
}

#[tokio::test]
async fn run_with_timeout_timeout_elapsed() {
    let mut cmd = Command::new("sleep");
    cmd.arg("10");
    let result = run_with_timeout(cmd, Some(Duration::from_millis(100)), "test sleep").await;
    let err = result.unwrap_err();
    assert!(err.contains("timed out"), "got: {}", err);
    assert!(err.contains("test sleep"), "got: {}", err);
}

#[tokio::test]
async fn run_with_input_feeds_stdin() {
    let cmd = Command::new("cat");
    let output = run_with_input(cmd, b"notebook bytes".to_vec(), None, "cat")
        .await
        .unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout, b"notebook bytes");
}

#[tokio::test]
async fn run_with_input_spawn_error() {
    let cmd = Command::new("/nonexistent/binary");
    let err = run_with_input(cmd, Vec::new(), None, "upload").await.unwrap_err();
    assert!(err.starts_with("upload failed:"), "got: {}", err);
}
