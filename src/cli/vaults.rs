//! Vaults command.
//!
//! Non-interactive listing of every vault in the account.

use std::sync::Arc;

use crate::cli::output;
use crate::core::config::Config;
use crate::core::constants::DEFAULT_BUFFER;
use crate::core::domain::{format_tags, Vault};
use crate::core::pipeline::{paginate, Scope};
use crate::core::remote::{Account, SecretDirectory};
use crate::core::table::{Column, Table};
use crate::error::Result;

/// List vaults as a table or JSON.
pub async fn execute(config: &Config, json: bool) -> Result<()> {
    let (directory, account) = super::connect(config).await?;
    let vaults = list(directory, &account).await?;

    if !json && vaults.is_empty() {
        output::dimmed("no vaults found");
    } else {
        output::data(&render(&vaults, json)?);
    }
    Ok(())
}

/// Listing output: a JSON document with `vaults` and `count`, or the table.
pub fn render(vaults: &[Vault], json: bool) -> Result<String> {
    if !json {
        return Ok(table().render(vaults));
    }

    let vaults_json: Vec<_> = vaults
        .iter()
        .map(|v| {
            serde_json::json!({
                "id": v.id,
                "name": v.name,
                "resource_group": v.resource_group(),
                "location": v.location,
                "tenant_id": v.tenant_id,
                "uri": v.uri,
                "tags": v.tags,
            })
        })
        .collect();

    let result = serde_json::json!({
        "vaults": vaults_json,
        "count": vaults.len(),
    });
    Ok(serde_json::to_string_pretty(&result)?)
}

/// Every vault in `account`, in listing order.
pub async fn list(directory: Arc<dyn SecretDirectory>, account: &Account) -> Result<Vec<Vault>> {
    let scope = Scope::new(DEFAULT_BUFFER);
    let account = account.clone();
    let stream = paginate(&scope, move |cursor| {
        let directory = Arc::clone(&directory);
        let account = account.clone();
        async move { directory.vault_page(&account, cursor.as_deref()).await }
    });
    let result = stream.collect().await;
    scope.shutdown().await;
    result
}

pub fn table() -> Table<Vault> {
    Table::new(vec![
        Column::new("ID", |v: &Vault| v.id.clone()),
        Column::new("NAME", |v: &Vault| v.name.clone()),
        Column::new("RESOURCE GROUP", |v: &Vault| {
            v.resource_group().unwrap_or_default().to_string()
        }),
        Column::new("LOCATION", |v: &Vault| v.location.clone()),
        Column::new("TAGS", |v: &Vault| format_tags(&v.tags)),
    ])
}
