//! Vault type.
//!
//! A remote container of secrets, as enumerated from the account. Secrets
//! refer back to their vault through a [`VaultId`] into a [`VaultTable`]
//! rather than holding the vault itself.

use std::collections::BTreeMap;
use std::sync::Arc;

/// A key vault in the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vault {
    /// Resource id, unique and stable
    pub id: String,
    /// Vault name
    pub name: String,
    /// Resource tags
    pub tags: BTreeMap<String, String>,
    /// Azure region
    pub location: String,
    /// Owning tenant
    pub tenant_id: String,
    /// Data-plane endpoint for secret operations
    pub uri: String,
}

impl Vault {
    /// Resource group parsed from the resource id.
    ///
    /// `/subscriptions/{sub}/resourceGroups/{rg}/providers/...` yields `{rg}`.
    pub fn resource_group(&self) -> Option<&str> {
        let mut segments = self.id.split('/');
        while let Some(segment) = segments.next() {
            if segment.eq_ignore_ascii_case("resourceGroups") {
                return segments.next().filter(|rg| !rg.is_empty());
            }
        }
        None
    }
}

/// Index of a vault inside a [`VaultTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VaultId(usize);

/// Immutable table of the vaults chosen for a session.
///
/// Cloning is cheap; every clone shares the same vaults.
#[derive(Debug, Clone, Default)]
pub struct VaultTable {
    vaults: Arc<[Vault]>,
}

impl VaultTable {
    pub fn new(vaults: Vec<Vault>) -> Self {
        Self {
            vaults: vaults.into(),
        }
    }

    pub fn get(&self, id: VaultId) -> Option<&Vault> {
        self.vaults.get(id.0)
    }

    /// Ids of every vault, in table order.
    pub fn ids(&self) -> Vec<VaultId> {
        (0..self.vaults.len()).map(VaultId).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VaultId, &Vault)> {
        self.vaults.iter().enumerate().map(|(i, v)| (VaultId(i), v))
    }

    pub fn len(&self) -> usize {
        self.vaults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vaults.is_empty()
    }
}
