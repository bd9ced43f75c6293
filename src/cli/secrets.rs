//! Secrets command.
//!
//! Non-interactive listing of the secrets in one vault, as latest pointers.

use std::sync::Arc;

use crate::cli::output;
use crate::core::config::Config;
use crate::core::constants::TIME_FORMAT;
use crate::core::domain::{format_tags, Secret, VaultTable};
use crate::core::pipeline::{self, ListSecrets, Scope};
use crate::core::remote::{Account, SecretDirectory};
use crate::core::table::{Column, Table};
use crate::error::{RemoteError, Result};

/// List the secrets of `vault_name` as a table or JSON.
pub async fn execute(config: &Config, vault_name: &str, json: bool) -> Result<()> {
    let (directory, account) = super::connect(config).await?;
    let secrets = list(directory, &account, vault_name, config.picker.buffer).await?;

    if !json && secrets.is_empty() {
        output::dimmed(&format!("no secrets in {}", vault_name));
    } else {
        output::data(&render(&secrets, json)?);
    }
    Ok(())
}

/// Secrets of the vault named `vault_name`, matched case-insensitively.
///
/// # Errors
///
/// `RemoteError::NotFound` when the account has no vault by that name.
pub async fn list(
    directory: Arc<dyn SecretDirectory>,
    account: &Account,
    vault_name: &str,
    buffer: usize,
) -> Result<Vec<Secret>> {
    let vault = super::vaults::list(Arc::clone(&directory), account)
        .await?
        .into_iter()
        .find(|v| v.name.eq_ignore_ascii_case(vault_name))
        .ok_or_else(|| RemoteError::NotFound {
            url: format!("/subscriptions/{}", account.subscription),
            message: format!("no vault named '{}'", vault_name),
        })?;

    let vaults = VaultTable::new(vec![vault]);
    let scope = Scope::new(buffer);
    let ids = scope.replay(vaults.ids());
    let stream = pipeline::run(&scope, ids, ListSecrets::new(directory, vaults));
    let result = stream.collect().await;
    scope.shutdown().await;
    result
}

/// Listing output: a JSON document with `secrets` and `count`, or the table.
pub fn render(secrets: &[Secret], json: bool) -> Result<String> {
    if !json {
        return Ok(table().render(secrets));
    }

    let secrets_json: Vec<_> = secrets
        .iter()
        .map(|s| {
            serde_json::json!({
                "id": s.id(),
                "name": s.name,
                "version": s.version.to_string(),
                "enabled": s.enabled,
                "created": s.created.map(|c| c.to_rfc3339()),
                "content_type": s.content_type,
                "managed": s.managed,
                "tags": s.tags,
            })
        })
        .collect();

    let result = serde_json::json!({
        "secrets": secrets_json,
        "count": secrets.len(),
    });
    Ok(serde_json::to_string_pretty(&result)?)
}

pub fn table() -> Table<Secret> {
    Table::new(vec![
        Column::new("NAME", |s: &Secret| s.name.clone()),
        Column::new("VERSION", |s: &Secret| s.version.to_string()).min_width(6),
        Column::new("ENABLED", |s: &Secret| s.enabled.to_string()),
        Column::new("CREATED", |s: &Secret| {
            s.created
                .map(|c| c.format(TIME_FORMAT).to_string())
                .unwrap_or_default()
        }),
        Column::new("TAGS", |s: &Secret| format_tags(&s.tags)),
    ])
}
