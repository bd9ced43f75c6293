//! Tests for error reporting and exit codes.

use predicates::prelude::*;

use crate::support::*;

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    let output = t.cmd().arg("unknown-command").output().unwrap();
    assert_failure(&output);
}

#[test]
fn test_missing_picker_fails_before_any_listing() {
    let t = Test::new();

    t.cmd()
        .env("ASF_PICKER", "asf-test-no-such-picker")
        .arg("browse")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "picker 'asf-test-no-such-picker' is not installed",
        ))
        .stderr(predicate::str::contains("install fzf"));
}

#[test]
fn test_default_command_is_browse() {
    let t = Test::new();

    let output = t
        .cmd()
        .env("ASF_PICKER", "asf-test-no-such-picker")
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "not installed");
}

#[test]
fn test_verbose_flag_accepted() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["--verbose", "completions", "fish"])
        .output()
        .unwrap();
    assert_success(&output);
}

#[test]
fn test_logs_stay_off_stdout() {
    let t = Test::new();

    let output = t
        .cmd()
        .env("ASF_PICKER", "asf-test-no-such-picker")
        .env("ASF_LOG", "asf=trace")
        .arg("browse")
        .output()
        .unwrap();
    assert_failure(&output);
    assert!(stdout(&output).is_empty());
}
