//! Shell completion scripts.

use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell as Target;

use crate::cli::{Cli, Shell};
use crate::error::Result;

impl From<Shell> for Target {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => Target::Bash,
            Shell::Zsh => Target::Zsh,
            Shell::Fish => Target::Fish,
            Shell::PowerShell => Target::PowerShell,
        }
    }
}

/// Print the completion script for `shell`.
pub fn execute(shell: Shell) -> Result<()> {
    write(shell, &mut std::io::stdout().lock());
    Ok(())
}

/// Write the completion script for `shell` to `out`, named after the binary.
pub fn write(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    clap_complete::generate(Target::from(shell), &mut cmd, bin, out);
}
