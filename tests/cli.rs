//! Command line tests: the binary run as a child process.
#![cfg(unix)]

use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::Duration;

fn konane() -> Command {
    Command::new(env!("CARGO_BIN_EXE_konane"))
}

/// Start a long random series, send `signal` once it is running and collect the output.
fn interrupted_series(signal: &str) -> Output {
    let child = konane()
        .args(["play", "-i", "100000000", "-r", "6", "-c", "6"])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    thread::sleep(Duration::from_millis(500));
    let status = Command::new("kill")
        .arg(format!("-{signal}"))
        .arg(child.id().to_string())
        .status()
        .unwrap();
    assert!(status.success());
    child.wait_with_output().unwrap()
}

fn assert_reports_partial_tally(output: &Output) {
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{:?}\n{stdout}", output.status);
    assert!(stdout.contains("X wins: "), "{stdout}");
    assert!(stdout.contains("O wins: "), "{stdout}");
    assert!(stdout.contains("Interrupted after "), "{stdout}");
}

// =============================================================================
// Interrupts
// =============================================================================

#[test]
fn test_sigint_stops_series() {
    assert_reports_partial_tally(&interrupted_series("INT"));
}

#[test]
fn test_sigquit_stops_series() {
    assert_reports_partial_tally(&interrupted_series("QUIT"));
}

#[test]
fn test_sigabrt_stops_series() {
    assert_reports_partial_tally(&interrupted_series("ABRT"));
}

// =============================================================================
// Argument validation
// =============================================================================

#[test]
fn test_turn_rejects_overflowing_dimensions() {
    let output = konane()
        .args(["turn", "-p", "x", "-r", "18446744073709551615", "-c", "2", "xo"])
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1), "{stderr}");
    assert!(stderr.contains("invalid board dimensions"), "{stderr}");
}

#[test]
fn test_play_rejects_oversized_board() {
    let output = konane()
        .args(["play", "-r", "100000", "-c", "100000"])
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1), "{stderr}");
    assert!(stderr.contains("invalid board dimensions"), "{stderr}");
}

#[test]
fn test_turn_answers_opening() {
    let output = konane()
        .args(["turn", "-p", "x", "-r", "4", "-c", "4", "xoxooxoxxoxooxox"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "(0, 0)");
}
