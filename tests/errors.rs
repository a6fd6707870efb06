use assert_cmd::Command;
use predicates::prelude::*;
use std::time::Duration;

fn cargo_bin() -> Command { Command::cargo_bin("bf").unwrap() }

#[test]
fn test_no_subcommand_prints_usage() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_missing_code_is_usage_error() {
    cargo_bin()
        .timeout(Duration::from_secs(2)).arg("run")
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_code_and_file_conflict() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .args(["run", "--file", "missing.bf", "+"])
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot use positional code together with --file"));
}

#[test]
fn test_unreadable_file() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .args(["run", "--file", "/definitely/not/here.bf"])
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read code file"));
}

#[test]
fn test_bad_bit_width() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .args(["run", "--bits", "64", "+"])
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported cell width: 64 bits"));
}

#[test]
fn test_unbalanced_brackets_are_not_errors() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .args(["run", "]+.["])
        .write_stdin("")
        .assert()
        .success()
        .stdout("\u{1}\n")
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_subcommand_help_exits_zero() {
    cargo_bin()
        .timeout(Duration::from_secs(2))
        .args(["trace", "--help"])
        .assert()
        .success()
        .stderr(predicate::str::contains("trace [OPTIONS]"));
}
