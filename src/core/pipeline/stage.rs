//! Streaming stages.
//!
//! A stage is one worker task that walks its input in order and runs a
//! [`Step`] per item. A step may emit any number of results, all of them
//! before the next input item is touched, so output order follows input
//! order. The first error ends the stage and is passed downstream.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace};

use super::{pump, Emitter, Flow, ItemStream, Scope};
use crate::core::domain::{Secret, Vault, VaultId, VaultTable};
use crate::core::remote::SecretDirectory;
use crate::error::{Error, Result};

/// Per-item work of a stage.
#[async_trait]
pub trait Step: Send + 'static {
    type Input: Send + 'static;
    type Output: Send + 'static;

    /// Stage name used in logs.
    const NAME: &'static str;

    /// Process one input item, emitting its results into `out`.
    async fn apply(&mut self, item: Self::Input, out: &Emitter<Self::Output>) -> Result<Flow>;
}

/// Run `step` over `input` on a worker task of `scope`.
pub fn run<S: Step>(
    scope: &Scope,
    mut input: ItemStream<S::Input>,
    mut step: S,
) -> ItemStream<S::Output> {
    let (out, stream) = scope.channel();
    scope.spawn(S::NAME, async move {
        let mut processed = 0usize;
        while let Some(item) = input.next().await {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    out.fail(e).await;
                    return;
                }
            };
            match step.apply(item, &out).await {
                Ok(Flow::Done) => processed += 1,
                Ok(Flow::Stopped) => {
                    debug!(stage = S::NAME, processed, "consumer gone, stage stopped");
                    return;
                }
                Err(e) => {
                    debug!(stage = S::NAME, processed, error = %e, "stage failed");
                    out.fail(e).await;
                    return;
                }
            }
        }
        debug!(stage = S::NAME, processed, "stage complete");
    });
    stream
}

fn flow(emitted: bool) -> Flow {
    if emitted {
        Flow::Done
    } else {
        Flow::Stopped
    }
}

fn lookup(vaults: &VaultTable, id: VaultId) -> Result<&Vault> {
    vaults
        .get(id)
        .ok_or_else(|| Error::Other(format!("secret refers to unknown vault {:?}", id)))
}

/// Lists the secrets (latest pointers) of each input vault.
pub struct ListSecrets {
    directory: Arc<dyn SecretDirectory>,
    vaults: VaultTable,
}

impl ListSecrets {
    pub fn new(directory: Arc<dyn SecretDirectory>, vaults: VaultTable) -> Self {
        Self { directory, vaults }
    }
}

#[async_trait]
impl Step for ListSecrets {
    type Input = VaultId;
    type Output = Secret;
    const NAME: &'static str = "list-secrets";

    async fn apply(&mut self, id: VaultId, out: &Emitter<Secret>) -> Result<Flow> {
        let vault = lookup(&self.vaults, id)?.clone();
        debug!(vault = %vault.name, "listing secrets");

        let directory = Arc::clone(&self.directory);
        pump(
            move |cursor| {
                let directory = Arc::clone(&directory);
                let vault = vault.clone();
                async move {
                    let page = directory.secret_page(&vault, cursor.as_deref()).await?;
                    Ok(page.map(|record| Secret::new(id, &vault, record)))
                }
            },
            out,
        )
        .await
    }
}

/// Expands each input secret into its versions.
///
/// A latest pointer is passed on first, followed by every concrete version.
pub struct ListVersions {
    directory: Arc<dyn SecretDirectory>,
    vaults: VaultTable,
}

impl ListVersions {
    pub fn new(directory: Arc<dyn SecretDirectory>, vaults: VaultTable) -> Self {
        Self { directory, vaults }
    }
}

#[async_trait]
impl Step for ListVersions {
    type Input = Secret;
    type Output = Secret;
    const NAME: &'static str = "list-versions";

    async fn apply(&mut self, secret: Secret, out: &Emitter<Secret>) -> Result<Flow> {
        let vault_id = secret.vault;
        let vault = lookup(&self.vaults, vault_id)?.clone();
        let name = secret.name.clone();
        debug!(vault = %vault.name, secret = %name, "listing versions");

        if secret.version.is_latest() && !out.emit(secret).await {
            return Ok(Flow::Stopped);
        }

        let directory = Arc::clone(&self.directory);
        pump(
            move |cursor| {
                let directory = Arc::clone(&directory);
                let vault = vault.clone();
                let name = name.clone();
                async move {
                    let page = directory
                        .version_page(&vault, &name, cursor.as_deref())
                        .await?;
                    Ok(page.map(|record| Secret::new(vault_id, &vault, record)))
                }
            },
            out,
        )
        .await
    }
}

/// Attaches the value to each input secret.
///
/// Secrets that already carry a value are passed through without a remote
/// call.
pub struct FetchValues {
    directory: Arc<dyn SecretDirectory>,
    vaults: VaultTable,
}

impl FetchValues {
    pub fn new(directory: Arc<dyn SecretDirectory>, vaults: VaultTable) -> Self {
        Self { directory, vaults }
    }
}

#[async_trait]
impl Step for FetchValues {
    type Input = Secret;
    type Output = Secret;
    const NAME: &'static str = "fetch-values";

    async fn apply(&mut self, secret: Secret, out: &Emitter<Secret>) -> Result<Flow> {
        if secret.has_value() {
            trace!(secret = %secret, "value already fetched");
            return Ok(flow(out.emit(secret).await));
        }

        let vault = lookup(&self.vaults, secret.vault)?;
        debug!(vault = %vault.name, secret = %secret, "fetching value");
        let value = self
            .directory
            .secret_value(vault, &secret.name, &secret.version)
            .await?;

        Ok(flow(out.emit(secret.with_value(value)).await))
    }
}
