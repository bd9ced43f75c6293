//! Tests for help, version and completions.

use predicates::prelude::*;

use crate::support::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::new();

    t.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("browse"))
        .stdout(predicate::str::contains("vaults"))
        .stdout(predicate::str::contains("secrets"))
        .stdout(predicate::str::contains("--subscription"));
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    let output = t.cmd().arg("--version").output().unwrap();
    assert_success(&output);
    assert!(stdout(&output).starts_with("asf "));
}

#[test]
fn test_completions_bash_outputs_script() {
    let t = Test::new();

    let output = t.cmd().args(["completions", "bash"]).output().unwrap();
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("_asf()"));
    assert!(out.contains("vaults"));
}

#[test]
fn test_completions_work_without_config() {
    let t = Test::new();
    let missing = t.dir.path().join("nope.toml");

    // completions never load the config
    t.cmd()
        .args(["--config"])
        .arg(&missing)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef asf"));
}

#[test]
fn test_secrets_requires_vault_argument() {
    let t = Test::new();

    t.cmd()
        .arg("secrets")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<VAULT>"));
}
