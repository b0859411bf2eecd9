//! Tests the `icsearch` binary's CLI interface end to end.

use std::io::Write;
use std::process::{Command, ExitStatus, Stdio};

fn run_icsearch(args: &[&str]) -> (ExitStatus, String, String) {
  let output = Command::new(env!("CARGO_BIN_EXE_icsearch"))
    .args(args)
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .output()
    .expect("failed to spawn icsearch");

  let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
  let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
  (output.status, stdout, stderr)
}

#[test]
fn finds_a_factorization_of_six() {
  let (status, stdout, _stderr) = run_icsearch(&["6"]);
  assert!(status.success());
  assert!(stdout.contains("found a solution at index"));
  assert!(stdout.contains("= 6"));
}

#[test]
fn rejects_n_less_than_two() {
  let (status, _stdout, stderr) = run_icsearch(&["1"]);
  assert!(!status.success());
  assert!(stderr.contains("must be greater than 1"));
}

#[test]
fn reports_exhaustion_when_ceiling_is_too_low() {
  let (status, _stdout, stderr) = run_icsearch(&["997", "--index-ceiling", "1"]);
  assert!(!status.success());
  assert!(stderr.contains("no solution found"));
}

#[test]
fn writes_a_dot_export_on_success() {
  let dir = tempfile::tempdir().unwrap();
  let dot_path = dir.path().join("solution.dot");

  let (status, stdout, _stderr) = run_icsearch(&["6", "--dot", dot_path.to_str().unwrap()]);
  assert!(status.success());
  assert!(stdout.contains("wrote DOT export"));

  let contents = std::fs::read_to_string(&dot_path).unwrap();
  assert!(contents.starts_with("digraph"));
}

#[test]
fn config_file_supplies_defaults_overridden_by_flags() {
  let mut file = tempfile::NamedTempFile::new().unwrap();
  writeln!(file, "jobs = 2").unwrap();
  writeln!(file, "gas_limit = 100000").unwrap();
  file.flush().unwrap();

  // The CLI flag (-g) should win over the config file's gas_limit.
  let (status, stdout, _stderr) = run_icsearch(&["6", "--config", file.path().to_str().unwrap(), "-g", "200000"]);
  assert!(status.success());
  assert!(stdout.contains("found a solution at index"));
}

#[test]
fn malformed_config_file_is_a_reported_error() {
  let mut file = tempfile::NamedTempFile::new().unwrap();
  writeln!(file, "max_nodes = \"not a number\"").unwrap();
  file.flush().unwrap();

  let (status, _stdout, stderr) = run_icsearch(&["6", "--config", file.path().to_str().unwrap()]);
  assert!(!status.success());
  assert!(stderr.contains("could not parse config file"));
}

#[test]
fn verbose_flag_does_not_break_a_successful_run() {
  let (status, stdout, _stderr) = run_icsearch(&["6", "-v"]);
  assert!(status.success());
  assert!(stdout.contains("found a solution at index"));
}
