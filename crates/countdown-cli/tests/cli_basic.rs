//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. `HOME` points
//! at a scratch directory so the config file never touches the real one.

use std::io::Write;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &std::path::Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "countdown-cli", "--"])
        .args(args)
        .env("HOME", home)
        .env_remove("COUNTDOWN_ENV")
        .env_remove("COUNTDOWN_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Run a CLI command with `input` piped to stdin, then closed.
fn run_cli_with_input(home: &std::path::Path, args: &[&str], input: &str) -> (String, String, i32) {
    let mut child = Command::new("cargo")
        .args(["run", "-q", "-p", "countdown-cli", "--"])
        .args(args)
        .env("HOME", home)
        .env_remove("COUNTDOWN_ENV")
        .env_remove("COUNTDOWN_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI command");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");
    let output = child.wait_with_output().expect("Failed to wait for CLI");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn scratch_home() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp home")
}

#[test]
fn test_timer_format() {
    let home = scratch_home();
    let (stdout, _, code) = run_cli(home.path(), &["timer", "format", "3661"]);
    assert_eq!(code, 0, "Timer format failed");
    assert_eq!(stdout.trim(), "01:01:01");
}

#[test]
fn test_timer_preview() {
    let home = scratch_home();
    let (stdout, _, code) = run_cli(
        home.path(),
        &["timer", "preview", "--hours", "1", "--minutes", "1", "--seconds", "1"],
    );
    assert_eq!(code, 0, "Timer preview failed");
    assert!(stdout.contains("duration  01:01:01"), "got: {stdout}");
    assert!(stdout.contains("completes "), "got: {stdout}");
}

#[test]
fn test_timer_preview_json_uses_config_defaults() {
    let home = scratch_home();
    let (stdout, _, code) = run_cli(home.path(), &["timer", "preview", "--json"]);
    assert_eq!(code, 0, "Timer preview --json failed");
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("preview is JSON");
    assert_eq!(json["duration_secs"], 10);
    assert_eq!(json["duration"], "00:00:10");
    assert_eq!(json["selection"]["seconds"], 10);
}

#[test]
fn test_timer_preview_rejects_out_of_range() {
    let home = scratch_home();
    let (_, stderr, code) = run_cli(home.path(), &["timer", "preview", "--minutes", "75"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("minutes must be between 0 and 59"), "got: {stderr}");
}

#[test]
fn test_timer_run_zero_duration_completes_immediately() {
    let home = scratch_home();
    let (stdout, _, code) = run_cli(home.path(), &["timer", "run", "--duration", "0"]);
    assert_eq!(code, 0, "Timer run failed");
    assert!(stdout.contains("done"), "got: {stdout}");
}

#[test]
fn test_timer_run_counts_down_to_zero() {
    let home = scratch_home();
    let (stdout, _, code) = run_cli(home.path(), &["timer", "run", "--duration", "00:00:02"]);
    assert_eq!(code, 0, "Timer run failed");
    let frames: Vec<&str> = stdout.lines().collect();
    assert!(frames[0].contains("00:00:02"), "got: {stdout}");
    assert!(frames.iter().any(|f| f.contains("00:00:01")));
    assert!(frames.iter().any(|f| f.contains("00:00:00")));
    assert!(frames.last().unwrap().contains("done"));
    assert!(frames.last().unwrap().contains("[Start]"));
}

#[test]
fn test_config_get_set_list() {
    let home = scratch_home();
    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "timer.default_seconds"]);
    assert_eq!(code, 0, "Config get failed");
    assert_eq!(stdout.trim(), "10");

    let (stdout, _, code) = run_cli(home.path(), &["config", "set", "timer.default_minutes", "3"]);
    assert_eq!(code, 0, "Config set failed");
    assert!(stdout.contains("00:03:10"), "got: {stdout}");

    let (stdout, _, code) = run_cli(home.path(), &["config", "list"]);
    assert_eq!(code, 0, "Config list failed");
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("list is JSON");
    assert_eq!(json["timer"]["default_minutes"], 3);

    let (stdout, _, _) = run_cli(home.path(), &["timer", "preview", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["duration_secs"], 190);
}

#[test]
fn test_config_set_unknown_key_fails() {
    let home = scratch_home();
    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "ui.nope", "1"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown config key"), "got: {stderr}");
}

#[test]
fn test_config_reset() {
    let home = scratch_home();
    let (stdout, _, code) = run_cli(home.path(), &["config", "reset"]);
    assert_eq!(code, 0, "Config reset failed");
    assert!(stdout.contains("config reset to defaults"));
}

#[test]
fn test_completions_bash() {
    let home = scratch_home();
    let (stdout, _, code) = run_cli(home.path(), &["completions", "bash"]);
    assert_eq!(code, 0, "Completions failed");
    assert!(stdout.contains("countdown-cli"));
}

#[test]
fn test_timer_run_exits_when_input_closes_while_paused() {
    let home = scratch_home();
    let (stdout, _, code) =
        run_cli_with_input(home.path(), &["timer", "run", "--duration", "10", "--plain"], "p\n");
    assert_eq!(code, 0, "Timer run failed");
    let frames: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        frames.iter().filter(|f| f.contains("(paused)")).count(),
        1,
        "paused frame drawn more than once: {stdout}"
    );
    let last = frames.last().unwrap();
    assert!(last.contains("cancelled") && last.contains("[Start]"), "got: {stdout}");
}

#[test]
fn test_timer_run_logs_ignored_commands_by_default() {
    let home = scratch_home();
    let (stdout, stderr, code) =
        run_cli_with_input(home.path(), &["timer", "run", "--duration", "30"], "resume\ncancel\n");
    assert_eq!(code, 0, "Timer run failed");
    assert!(stderr.contains("resume ignored"), "got: {stderr}");
    assert!(stdout.contains("not available while running"), "got: {stdout}");
    assert!(stdout.contains("cancelled"), "got: {stdout}");
}

#[test]
fn test_config_set_rejects_default_outside_picker_range() {
    let home = scratch_home();
    let (_, stderr, code) = run_cli(home.path(), &["config", "set", "timer.default_seconds", "75"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("seconds must be between 0 and 59"), "got: {stderr}");

    let (stdout, _, _) = run_cli(home.path(), &["config", "get", "timer.default_seconds"]);
    assert_eq!(stdout.trim(), "10");
}

#[test]
fn test_config_path_points_into_home() {
    let home = scratch_home();
    let (stdout, _, code) = run_cli(home.path(), &["config", "path"]);
    assert_eq!(code, 0, "Config path failed");
    assert!(stdout.trim().ends_with(".config/countdown/config.toml"), "got: {stdout}");
    assert!(stdout.contains(home.path().to_str().unwrap()));
}
