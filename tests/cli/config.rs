//! Tests for config file handling.

use predicates::prelude::*;

use crate::support::*;

#[test]
fn test_missing_explicit_config_fails() {
    let t = Test::new();
    let missing = t.dir.path().join("missing.toml");

    t.cmd()
        .arg("--config")
        .arg(&missing)
        .arg("browse")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn test_malformed_config_fails() {
    let t = Test::new();
    let path = t.config("[picker\nbinary = ");

    t.cmd()
        .arg("--config")
        .arg(&path)
        .arg("browse")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

#[test]
fn test_invalid_config_value_fails() {
    let t = Test::new();
    let path = t.config("[picker]\nbuffer = 0\n");

    t.cmd()
        .arg("--config")
        .arg(&path)
        .arg("browse")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config value"));
}

#[test]
fn test_config_from_env_selects_picker() {
    let t = Test::new();
    let path = t.config("[picker]\nbinary = \"asf-test-configured-picker\"\n");

    t.cmd()
        .env("ASF_CONFIG", &path)
        .arg("browse")
        .assert()
        .failure()
        .stderr(predicate::str::contains("asf-test-configured-picker"));
}

#[test]
fn test_picker_env_overrides_config() {
    let t = Test::new();
    let path = t.config("[picker]\nbinary = \"asf-test-configured-picker\"\n");

    t.cmd()
        .arg("--config")
        .arg(&path)
        .env("ASF_PICKER", "asf-test-env-picker")
        .arg("browse")
        .assert()
        .failure()
        .stderr(predicate::str::contains("asf-test-env-picker"));
}
