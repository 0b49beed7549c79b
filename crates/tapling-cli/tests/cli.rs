//! CLI surface tests for the tapling binary

use assert_cmd::Command;
use predicates::prelude::*;

fn tapling() -> Command {
    Command::cargo_bin("tapling").unwrap()
}

#[test]
fn help_mentions_the_flags() {
    tapling()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--failfast"))
        .stdout(predicate::str::contains("--verbose"))
        .stdout(predicate::str::contains("--quiet"))
        .stdout(predicate::str::contains("--buffer"));
}

#[test]
fn version_prints_and_exits_zero() {
    tapling()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tapling"));
}

#[test]
fn no_arguments_exits_one() {
    tapling()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no test libraries given"));
}

#[test]
fn missing_library_surfaces_as_a_failing_case() {
    tapling()
        .arg("/nonexistent/libtests.so")
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("1..1\n"))
        .stdout(predicate::str::contains("not ok suite_error"));
}

#[test]
fn two_missing_libraries_declare_a_plan_of_two() {
    tapling()
        .args(["/nonexistent/a.so", "/nonexistent/b.so"])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("1..2\n"));
}

#[test]
fn unknown_flag_is_rejected() {
    tapling().arg("--parallel").assert().failure();
}
