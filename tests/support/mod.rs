//! Test support utilities for asf integration tests.
//!
//! In-memory stand-ins for the remote directory and the picker, plus an
//! isolated environment for running the binary.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;
pub mod picker;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use picker::*;

use tempfile::TempDir;

/// Test environment with an isolated home and config directory.
///
/// Child processes get their own `HOME` and `XDG_CONFIG_HOME`, so no user
/// config leaks in and tests can run in parallel.
pub struct Test {
    /// Working directory for the child process
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        Self { dir, home }
    }

    /// Write `contents` as a config file inside the test dir and return its path.
    pub fn config(&self, contents: &str) -> std::path::PathBuf {
        let path = self.dir.path().join("asf.toml");
        std::fs::write(&path, contents).expect("failed to write config");
        path
    }
}
