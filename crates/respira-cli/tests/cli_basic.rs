//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. RESPIRA_ENV
//! is forced to `dev` so runs never touch the production data directory.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "respira-cli", "--quiet", "--"])
        .args(args)
        .env("RESPIRA_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_pattern_list() {
    let (stdout, _, code) = run_cli(&["pattern", "list"]);
    assert_eq!(code, 0, "pattern list failed");
    assert!(stdout.contains("coherence-5-5"));
    assert!(stdout.contains("box-4x4"));
}

#[test]
fn test_pattern_list_json() {
    let (stdout, _, code) = run_cli(&["pattern", "list", "--json"]);
    assert_eq!(code, 0, "pattern list --json failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("invalid JSON");
    let patterns = parsed.as_array().expect("expected a JSON array");
    assert!(patterns.len() >= 5);
}

#[test]
fn test_pattern_show_preset() {
    let (stdout, _, code) = run_cli(&["pattern", "show", "relax-4-7-8"]);
    assert_eq!(code, 0, "pattern show failed");
    assert!(stdout.contains("Relaxation 4-7-8"));
}

#[test]
fn test_pattern_show_unknown_fails() {
    let (_, stderr, code) = run_cli(&["pattern", "show", "no-such-pattern"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown pattern"));
}

#[test]
fn test_pattern_create_breathe_and_history() {
    let (stdout, _, code) = run_cli(&[
        "pattern",
        "create",
        "Smoke Test",
        "--inhale",
        "1",
        "--exhale",
        "1",
        "--cycles",
        "1",
    ]);
    assert_eq!(code, 0, "pattern create failed");
    assert!(stdout.contains("Created pattern 'Smoke Test'"));

    // 1 ds phases, one cycle: the whole run takes ~0.2s of wall clock.
    let (stdout, _, code) = run_cli(&["breathe", "Smoke Test", "--mute", "--json"]);
    assert_eq!(code, 0, "breathe failed");
    assert!(stdout.contains("SessionStarted"));
    assert!(stdout.contains("SessionCompleted"));

    let (stdout, _, code) = run_cli(&["history", "--json"]);
    assert_eq!(code, 0, "history failed");
    assert!(stdout.contains("Smoke Test"));
}

#[test]
fn test_breathe_rejects_zero_cycles() {
    let (_, stderr, code) = run_cli(&["breathe", "coherence-5-5", "--cycles", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("cycle count"));
}

#[test]
fn test_stats() {
    let (stdout, _, code) = run_cli(&["stats"]);
    assert_eq!(code, 0, "stats failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("invalid JSON");
    assert!(parsed.get("total_sessions").is_some());
    assert_eq!(
        parsed["last_week"].as_array().map(|days| days.len()),
        Some(7)
    );
}

#[test]
fn test_history() {
    let (_, _, code) = run_cli(&["history"]);
    assert_eq!(code, 0, "history failed");
}

#[test]
fn test_config_show() {
    let (stdout, _, code) = run_cli(&["config", "show"]);
    assert_eq!(code, 0, "config show failed");
    assert!(stdout.contains("user"));
}

#[test]
fn test_config_set_and_show() {
    let (_, _, code) = run_cli(&["config", "set", "sound.muted", "true"]);
    assert_eq!(code, 0, "config set failed");
    let (stdout, _, code) = run_cli(&["config", "show"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("muted = true"));
    let (_, _, code) = run_cli(&["config", "set", "sound.muted", "false"]);
    assert_eq!(code, 0);
}

#[test]
fn test_config_set_unknown_key_fails() {
    let (_, stderr, code) = run_cli(&["config", "set", "no.such.key", "1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown configuration key"));
}

#[test]
fn test_completions() {
    let (stdout, _, code) = run_cli(&["completions", "bash"]);
    assert_eq!(code, 0, "completions failed");
    assert!(stdout.contains("respira"));
}
