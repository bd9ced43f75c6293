//! asf - fuzzy-pick Azure Key Vault secrets from the terminal.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use asf::cli::output;
use asf::cli::{execute, Cli};
use asf::core::constants::LOG_ENV;
use asf::error::{ConfigError, Error, PickerError, RemoteError};

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with picker output
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("asf=debug")
        } else {
            EnvFilter::new("asf=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    let err = match execute(cli) {
        Ok(()) => return,
        Err(e) => e,
    };

    if err.is_clean_exit() {
        output::notice(&err.to_string());
        std::process::exit(err.exit_code());
    }

    let suggestion = match &err {
        Error::Picker(PickerError::NotInstalled(_)) => {
            Some("install fzf (https://github.com/junegunn/fzf) or set ASF_PICKER")
        }
        Error::Config(ConfigError::NoSubscription) => {
            Some("pass --subscription, or run: az login")
        }
        Error::Remote(RemoteError::Credential { .. }) | Error::Remote(RemoteError::Auth { .. }) => {
            Some("run: az login")
        }
        Error::Remote(RemoteError::NotFound { .. }) => Some("check the name with: asf vaults"),
        _ => None,
    };

    output::error(&err.to_string());
    if let Some(hint) = suggestion {
        output::hint(hint);
    }
    std::process::exit(err.exit_code());
}
