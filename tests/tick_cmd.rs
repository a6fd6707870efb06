use assert_cmd::Command;
use predicates::prelude::*;
use std::time::Duration;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    cmd.timeout(Duration::from_secs(10)).env_remove("BF_SPEED_MS");
    cmd
}

#[test]
fn test_tick_runs_to_completion() {
    cargo_bin()
        .args(["tick", "--speed", "0", "++++++++[>++++++++<-]>+."])
        .write_stdin("")
        .assert()
        .success()
        .stdout("A\n");
}

#[test]
fn test_tick_streams_input() {
    cargo_bin()
        .args(["tick", "-s", "1", "--input", "ok", ",.,."])
        .assert()
        .success()
        .stdout("ok\n");
}

#[test]
fn test_tick_waiting_exits_one() {
    cargo_bin()
        .args(["tick", "--speed", "0", ",."])
        .write_stdin("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("program is waiting for input at instruction 0"));
}

#[test]
fn test_tick_eof_zero_finishes() {
    cargo_bin()
        .args(["tick", "--speed", "0", "--eof", "zero", ",[.,]"])
        .write_stdin("hi")
        .assert()
        .success()
        .stdout("hi\n");
}

#[test]
fn test_tick_speed_from_env() {
    cargo_bin()
        .env("BF_SPEED_MS", "0")
        .args(["tick", "+++."])
        .write_stdin("")
        .assert()
        .success()
        .stdout("\u{3}\n");
}

#[test]
fn test_tick_trace_logging_goes_to_stderr() {
    cargo_bin()
        .env("BF_LOG", "trace")
        .args(["tick", "--speed", "0", "+"])
        .write_stdin("")
        .assert()
        .success()
        .stdout("\n")
        .stderr(predicate::str::contains("tick"));
}
