//! Browse command.
//!
//! Runs the interactive session against the configured account.

use std::sync::Arc;

use tracing::debug;

use crate::cli::output;
use crate::core::config::Config;
use crate::core::domain::{Operation, Secret, VaultTable};
use crate::core::picker::{Fzf, Picker};
use crate::core::session::{Reporter, Session, SessionOptions};
use crate::error::Result;

/// Prints acknowledgements for operations that change nothing remotely.
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn acknowledge(&self, operation: Operation, secrets: &[Secret], vaults: &VaultTable) {
        output::warn(&format!(
            "{} is not supported yet; {} secrets left unchanged",
            output::name(operation.name()),
            output::count(secrets.len())
        ));
        for secret in secrets {
            let vault = vaults.get(secret.vault).map_or("?", |v| v.name.as_str());
            output::list_item(format!("{}/{}  {}", vault, secret, secret.id()));
        }
    }
}

/// Start an interactive session.
pub async fn execute(config: &Config) -> Result<()> {
    // fail before any listing starts
    let picker = Fzf::from_config(&config.picker);
    picker.ensure_available()?;

    let (directory, account) = super::connect(config).await?;
    debug!(subscription = %account.subscription, "starting session");

    let mut session = Session::new(
        directory,
        Arc::new(picker),
        Arc::new(ConsoleReporter),
        account,
        SessionOptions::from_config(config),
    );
    session.run().await
}
