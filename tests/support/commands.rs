//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;

impl Test {
    /// Create an asf command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - HOME and XDG_CONFIG_HOME inside the temporary home directory
    /// - Current directory set to the test directory
    /// - No inherited ASF_* overrides
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("asf").expect("failed to find asf binary");
        cmd.env("HOME", self.home.path());
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("XDG_CONFIG_HOME", self.home.path().join(".config"));
        cmd.env("NO_COLOR", "1");
        for var in ["ASF_CONFIG", "ASF_PICKER", "ASF_LOG", "ASF_SUBSCRIPTION"] {
            cmd.env_remove(var);
        }
        cmd.current_dir(self.dir.path());
        cmd
    }
}
