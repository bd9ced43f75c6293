//! Command-line interface.

pub mod browse;
pub mod completions;
pub mod output;
pub mod secrets;
pub mod vaults;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::core::config::Config;
use crate::core::remote::{Account, AzCli, AzureDirectory, SecretDirectory};
use crate::error::{ConfigError, Result};

/// asf - fuzzy-pick Azure Key Vault secrets from the terminal.
#[derive(Parser)]
#[command(
    name = "asf",
    about = "Fuzzy-pick Azure Key Vault secrets and chain operations on them",
    version,
    after_help = "Run without a command to start browsing."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subscription to enumerate vaults in
    #[arg(long, global = true, env = "ASF_SUBSCRIPTION", value_name = "ID")]
    pub subscription: Option<String>,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Browse vaults and secrets interactively (default)
    Browse,

    /// List the vaults in the subscription
    Vaults {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the secrets in one vault
    Secrets {
        /// Vault name
        vault: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute the parsed command line.
pub fn execute(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Command::Browse);
    if let Command::Completions { shell } = &command {
        return completions::execute(shell.clone());
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if cli.subscription.is_some() {
        config.azure.subscription = cli.subscription;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match command {
            Command::Browse => browse::execute(&config).await,
            Command::Vaults { json } => vaults::execute(&config, json).await,
            Command::Secrets { vault, json } => secrets::execute(&config, &vault, json).await,
            Command::Completions { .. } => Ok(()),
        }
    })
}

/// Resolve the account and build the directory client.
///
/// The subscription comes from the flag or config, falling back to the one
/// selected in the Azure CLI.
pub async fn connect(config: &Config) -> Result<(Arc<dyn SecretDirectory>, Account)> {
    let credentials = Arc::new(AzCli::new());

    let subscription = match &config.azure.subscription {
        Some(id) => id.clone(),
        None => {
            let id = credentials.default_subscription().await.map_err(|e| {
                debug!(error = %e, "subscription discovery failed");
                ConfigError::NoSubscription
            })?;
            debug!(subscription = %id, "using subscription from az");
            id
        }
    };

    let directory = AzureDirectory::new(&config.azure, credentials);
    Ok((Arc::new(directory), Account { subscription }))
}
