//! Remote vault directory.
//!
//! The [`SecretDirectory`] trait is everything the pipeline needs from the
//! cloud service: paged listings of vaults, secrets and versions, plus value
//! lookups. [`AzureDirectory`] implements it over the Azure REST APIs.
//!
//! ## Adding a New Backend
//!
//! 1. Implement `SecretDirectory`
//! 2. Return pages in service order; `Page::next` carries the cursor
//! 3. Map service failures onto `RemoteError`

mod azure;
mod credential;

pub use azure::AzureDirectory;
pub use credential::{AzCli, TokenSource};

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::core::domain::{SecretRecord, Vault, Version};
use crate::core::pipeline::Page;
use crate::error::Result;

/// The account vaults are enumerated in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub subscription: String,
}

/// Paged read access to vaults and their secrets.
///
/// Cursors are opaque; `None` requests the first page.
#[async_trait]
pub trait SecretDirectory: Send + Sync + 'static {
    /// One page of the vaults in `account`.
    async fn vault_page(&self, account: &Account, cursor: Option<&str>) -> Result<Page<Vault>>;

    /// One page of the secrets in `vault`, as latest pointers.
    async fn secret_page(&self, vault: &Vault, cursor: Option<&str>) -> Result<Page<SecretRecord>>;

    /// One page of the versions of secret `name`.
    async fn version_page(
        &self,
        vault: &Vault,
        name: &str,
        cursor: Option<&str>,
    ) -> Result<Page<SecretRecord>>;

    /// Value of secret `name` at `version`.
    async fn secret_value(
        &self,
        vault: &Vault,
        name: &str,
        version: &Version,
    ) -> Result<Zeroizing<String>>;
}
