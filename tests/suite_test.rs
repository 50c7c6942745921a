//! Runs the `trial-harness` binary against suite files

#![cfg(unix)]

use std::path::Path;
use std::process::{Command, Output};

fn harness_command(suite: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_trial-harness"));
    command
        .arg("--suite")
        .arg(suite)
        .args(["--color", "never"])
        .env_remove("RUST_LOG")
        .env_remove("RUST_TEST_THREADS");
    command
}

fn run_binary(suite: &Path, extra: &[&str]) -> Output {
    harness_command(suite)
        .args(["--test-threads", "1"])
        .args(extra)
        .output()
        .expect("Should run trial-harness")
}

const MIXED_SUITE: &str = r#"
name: "Mixed"
trials:
  - name: "first"
    command: "sleep 0.1; echo one"
    expect_output: "one"
  - name: "second"
    command: "sleep 0.1; echo two"
    expect_output: "two"
  - name: "third"
    command: "echo three; exit 3"
"#;

fn write_suite(dir: &Path, yaml: &str) -> std::path::PathBuf {
    let path = dir.join("suite.yaml");
    std::fs::write(&path, yaml).expect("Should write suite file");
    path
}

#[test]
fn test_passing_suite_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("data")).unwrap();
    std::fs::write(dir.path().join("data").join("input.txt"), "42\n").unwrap();

    let suite = write_suite(
        dir.path(),
        r#"
name: "Passing"
env:
  ANSWER: "42"
trials:
  - name: "echo"
    command: "echo hello"
    expect_output: "hello"
  - name: "reads_relative_file"
    command: "cat input.txt"
    working_dir: "data"
    expect_output: "(?m)^42$"
    use_regex: true
  - name: "sees_env"
    command: "test \"$ANSWER\" = 42"
  - name: "expected_exit"
    command: "exit 4"
    expect_exit: 4
"#,
    );

    let output = run_binary(&suite, &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0), "stdout:\n{}", stdout);
    assert!(stdout.contains("running 4 tests"), "{}", stdout);
    assert!(stdout.contains("test reads_relative_file ... ok"), "{}", stdout);
    assert!(stdout.contains("test result: ok. 4 passed; 0 failed"), "{}", stdout);
}

#[test]
fn test_failing_suite_exits_101() {
    let dir = tempfile::tempdir().unwrap();
    let suite = write_suite(
        dir.path(),
        r#"
name: "Failing"
trials:
  - name: "ok"
    command: "true"
  - name: "broken"
    command: "echo broken output; exit 1"
  - name: "later"
    command: "true"
    ignored: true
"#,
    );

    let output = run_binary(&suite, &[]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(101), "stdout:\n{}", stdout);
    assert!(stdout.contains("---- broken stdout ----"), "{}", stdout);
    assert!(stdout.contains("expected exit code 0, got 1"), "{}", stdout);
    assert!(stdout.contains("broken output"), "{}", stdout);
    assert!(
        stdout.contains("test result: FAILED. 1 passed; 1 failed; 1 ignored"),
        "{}",
        stdout
    );
}

#[test]
fn test_filter_reaches_the_harness() {
    let dir = tempfile::tempdir().unwrap();
    let suite = write_suite(
        dir.path(),
        r#"
name: "Filter"
trials:
  - name: "unit_a"
    command: "true"
  - name: "integration_b"
    command: "false"
"#,
    );

    let output = run_binary(&suite, &["unit"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0), "stdout:\n{}", stdout);
    assert!(stdout.contains("1 filtered out"), "{}", stdout);
}

#[test]
fn test_invalid_suite_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let suite = write_suite(dir.path(), "name: \"Empty\"\ntrials: []\n");

    let output = run_binary(&suite, &[]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("no trials"), "{}", stderr);
}

#[test]
fn test_missing_suite_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_binary(&dir.path().join("nope.yaml"), &[]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stderr.matches("Failed to load suite").count(), 1, "{}", stderr);
    assert!(stderr.starts_with("error: "), "{}", stderr);
}

#[test]
fn test_parallel_run_of_shell_trials() {
    let dir = tempfile::tempdir().unwrap();
    let suite = write_suite(dir.path(), MIXED_SUITE);

    let output = harness_command(&suite)
        .args(["--test-threads", "4"])
        .output()
        .expect("Should run trial-harness");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(101), "stdout:\n{}", stdout);
    assert!(stdout.contains("test first  ... ok"), "{}", stdout);
    assert!(stdout.contains("test second ... ok"), "{}", stdout);
    assert!(stdout.contains("test third  ... FAILED"), "{}", stdout);
    assert!(!stdout.contains("panicked"), "{}", stdout);
    assert!(
        stdout.contains("expected exit code 0, got 3\n---- command stdout ----\nthree"),
        "{}",
        stdout
    );
    assert!(!stdout.contains("---- command stderr ----"), "{}", stdout);
    assert!(
        stdout.contains("test result: FAILED. 2 passed; 1 failed; 0 ignored"),
        "{}",
        stdout
    );
}

#[test]
fn test_thread_count_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let suite = write_suite(dir.path(), MIXED_SUITE);

    let output = harness_command(&suite)
        .arg("--verbose")
        .env("RUST_TEST_THREADS", "3")
        .output()
        .expect("Should run trial-harness");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(101), "stdout:\n{}", stdout);
    assert!(stderr.contains("running trials on 3 threads"), "{}", stderr);
    assert!(stdout.contains("2 passed; 1 failed"), "{}", stdout);
}
