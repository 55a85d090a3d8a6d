//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with HOME pointed at a temp directory so the
//! user's real config is never touched.

use std::io::Write;
use std::process::{Command, Stdio};

/// Run the CLI with `home` as HOME and return (stdout, stderr, code).
fn run_cli_in(home: &std::path::Path, args: &[&str], stdin: Option<&str>) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_daybloom"))
        .args(args)
        .env("HOME", home)
        .env_remove("DAYBLOOM_ENV")
        .env_remove("DAYBLOOM_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn CLI");

    if let Some(input) = stdin {
        child
            .stdin
            .take()
            .unwrap()
            .write_all(input.as_bytes())
            .unwrap();
    } else {
        drop(child.stdin.take());
    }

    let output = child.wait_with_output().expect("Failed to wait for CLI");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);
    (stdout, stderr, code)
}

fn run_cli(args: &[&str]) -> (String, String, i32) {
    let home = tempfile::tempdir().unwrap();
    run_cli_in(home.path(), args, None)
}

#[test]
fn test_demo_text() {
    let (stdout, _, code) = run_cli(&["demo"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Tasks      0/3 done"));
    assert!(stdout.contains("Team Meeting"));
    assert!(stdout.contains("next Focus Session 25:00"));
}

#[test]
fn test_demo_json() {
    let (stdout, _, code) = run_cli(&["demo", "--json"]);
    assert_eq!(code, 0);
    let dash: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(dash["tasksTotal"], 3);
    assert_eq!(dash["topHabits"].as_array().unwrap().len(), 3);
    assert_eq!(dash["timer"]["type"], "StateSnapshot");
}

#[test]
fn test_streak_command() {
    let (stdout, _, code) = run_cli(&[
        "streak",
        "--today",
        "2024-05-10",
        "2024-05-10",
        "2024-05-09",
        "2024-05-08",
        "2024-05-06",
    ]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "3");
}

#[test]
fn test_streak_weekly() {
    let (stdout, _, code) = run_cli(&[
        "streak",
        "--frequency",
        "weekly",
        "--today",
        "2024-05-10",
        "2024-05-10",
        "2024-05-03",
        "2024-04-20",
    ]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "3");
}

#[test]
fn test_streak_rejects_bad_day() {
    let (_, stderr, code) = run_cli(&["streak", "2024-5-1"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("2024-5-1"));
}

#[test]
fn test_run_script_from_stdin() {
    let home = tempfile::tempdir().unwrap();
    let script = "{\"op\":\"start_session\"}\n{\"op\":\"log_interruption\"}\n{\"op\":\"skip_session\"}\n";
    let (stdout, _, code) = run_cli_in(
        home.path(),
        &["run", "--now", "2024-05-02T09:00:00Z"],
        Some(script),
    );
    assert_eq!(code, 0);
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1]["interruption_count"], 1);
    assert_eq!(lines[2]["next_type"], "shortBreak");
}

#[test]
fn test_run_seeded_dashboard() {
    let home = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli_in(
        home.path(),
        &["run", "--seed", "-"],
        Some("{\"op\":\"dashboard\"}\n"),
    );
    assert_eq!(code, 0);
    let dash: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(dash["tasksTotal"], 3);
}

#[test]
fn test_run_malformed_line_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli_in(home.path(), &["run"], Some("{\"op\":\"timer_status\"}\nnot json\n"));
    assert_eq!(code, 1);
    assert!(stderr.contains("error: line 2"));
}

#[test]
fn test_config_set_get_roundtrip() {
    let home = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli_in(home.path(), &["config", "set", "timer.work_duration", "50"], None);
    assert_eq!(code, 0);
    let (stdout, _, code) = run_cli_in(home.path(), &["config", "get", "timer.work_duration"], None);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "50");

    // The configured duration reaches the timer.
    let (stdout, _, _) = run_cli_in(home.path(), &["run"], Some("{\"op\":\"timer_status\"}\n"));
    let status: serde_json::Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(status["remaining_secs"], 3000);

    let (_, _, code) = run_cli_in(home.path(), &["config", "reset"], None);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli_in(home.path(), &["config", "get", "timer.work_duration"], None);
    assert_eq!(stdout.trim(), "25");
}

#[test]
fn test_config_unknown_key() {
    let (_, stderr, code) = run_cli(&["config", "get", "timer.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown configuration key: timer.nope"));
}

#[test]
fn test_config_rejects_zero_duration() {
    let (_, stderr, code) = run_cli(&["config", "set", "timer.short_break_duration", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));
}

#[test]
fn test_config_list() {
    let (stdout, _, code) = run_cli(&["config", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("habits.heatmap_days = 30"));
}

#[test]
fn test_completions() {
    let (stdout, _, code) = run_cli(&["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("daybloom"));
}
