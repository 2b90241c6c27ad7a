#![cfg(feature = "cli_api")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env_remove("ROSTER_SCHEDULER_CONFIG")
        .env("RUST_LOG", "off")
        .write_stdin(script.to_string())
        .assert()
}

#[test]
fn cli_generates_demo_schedule() {
    run_cli("demo\ngenerate\nstats\nquit\n")
        .success()
        .stdout(str_contains("Loaded 4 employees and 6 tasks."))
        .stdout(str_contains("tasks=6, assigned=6, unassigned=0"))
        .stdout(str_contains("completion=100%"));
}

#[test]
fn cli_reports_missing_training() {
    let script = "employee add Ada; Engineer; 5; 40; Python\n\
                  task add Port; 4; 5; 1; Rust\n\
                  generate\n\
                  quit\n";
    run_cli(script)
        .success()
        .stdout(str_contains("Employee 'Ada' added (ID: 1)."))
        .stdout(str_contains("Task 'Port' added (ID: 1)."))
        .stdout(str_contains("  - Missing required training: Rust"));
}

#[test]
fn cli_rejects_invalid_rank() {
    run_cli("employee add Ada; Engineer; 12; 40; Python\nquit\n")
        .success()
        .stdout(str_contains("Error: employee 1 has rank 12"));
}

#[test]
fn cli_delete_command_removes_task() {
    run_cli("demo\ntask delete 2\ntask delete 2\nquit\n")
        .success()
        .stdout(str_contains("Deleted task 2."))
        .stdout(str_contains("Task 2 not found."));
}

#[test]
fn cli_save_and_load_json_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().to_string();
    let script = format!(
        "task add Persisted; 4; 5; 1; Ops\nsave {path}\ntask add Temporary; 1; 5; 1; Ops\nload {path}\ntask list\nquit\n"
    );
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("Schedule loaded from"));
    let after_reload = output
        .split("Schedule loaded from")
        .last()
        .unwrap_or_default();
    assert!(after_reload.contains("Persisted"));
    assert!(
        !after_reload.contains("Temporary"),
        "temporary task should not appear after reload:\n{after_reload}"
    );
}

#[test]
fn cli_prints_report() {
    run_cli("demo\ngenerate\nreport summary\nquit\n")
        .success()
        .stdout(str_contains("SCHEDULE SUMMARY REPORT"))
        .stdout(str_contains("Valid Schedule:      Yes"));
}
