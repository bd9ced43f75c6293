//! In-memory secret directory and record builders.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use zeroize::Zeroizing;

use asf::core::domain::{Operation, Secret, SecretRecord, Vault, VaultTable, Version};
use asf::core::pipeline::Page;
use asf::core::remote::{Account, SecretDirectory};
use asf::core::session::Reporter;
use asf::error::{RemoteError, Result};

/// A vault with id `id` and name `name`.
pub fn vault(id: &str, name: &str) -> Vault {
    Vault {
        id: id.to_string(),
        name: name.to_string(),
        tags: BTreeMap::new(),
        location: "westeurope".to_string(),
        tenant_id: "tenant".to_string(),
        uri: format!("https://{}.vault.test/", name),
    }
}

/// A secret record; `"latest"` (or `""`) gives a latest pointer.
pub fn record(name: &str, version: &str) -> SecretRecord {
    SecretRecord {
        name: name.to_string(),
        version: Version::parse(version),
        tags: BTreeMap::new(),
        enabled: true,
        created: None,
        content_type: None,
        managed: false,
    }
}

/// Secrets bound to the first vault of `vaults`.
pub fn secrets_in(vaults: &VaultTable, records: &[(&str, &str)]) -> Vec<Secret> {
    let (id, vault) = vaults.iter().next().expect("empty vault table");
    records
        .iter()
        .map(|(name, version)| Secret::new(id, vault, record(name, version)))
        .collect()
}

pub fn account() -> Account {
    Account {
        subscription: "sub".to_string(),
    }
}

/// Remote calls made against a [`FakeDirectory`].
#[derive(Debug, Default)]
pub struct Calls {
    pub vault_pages: AtomicUsize,
    pub secret_pages: AtomicUsize,
    pub version_pages: AtomicUsize,
    pub values: AtomicUsize,
}

impl Calls {
    pub fn vault_pages(&self) -> usize {
        self.vault_pages.load(Ordering::SeqCst)
    }

    pub fn secret_pages(&self) -> usize {
        self.secret_pages.load(Ordering::SeqCst)
    }

    pub fn version_pages(&self) -> usize {
        self.version_pages.load(Ordering::SeqCst)
    }

    pub fn values(&self) -> usize {
        self.values.load(Ordering::SeqCst)
    }
}

/// Scripted [`SecretDirectory`].
///
/// Listings are served as pre-split pages; the cursor is the index of the
/// next page. Values default to `pw-{name}-{version}`.
#[derive(Default)]
pub struct FakeDirectory {
    vaults: Vec<Vec<Vault>>,
    secrets: HashMap<String, Vec<Vec<SecretRecord>>>,
    versions: HashMap<(String, String), Vec<Vec<SecretRecord>>>,
    endless: HashSet<String>,
    failing: HashSet<String>,
    pub calls: Calls,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `pages` as the vault listing.
    pub fn vault_pages(mut self, pages: Vec<Vec<Vault>>) -> Self {
        self.vaults = pages;
        self
    }

    /// Serve `pages` as the secret listing of vault `name`.
    pub fn secret_pages(mut self, vault: &str, pages: Vec<Vec<SecretRecord>>) -> Self {
        self.secrets.insert(vault.to_string(), pages);
        self
    }

    /// Serve `pages` as the version listing of `secret` in `vault`.
    pub fn version_pages(
        mut self,
        vault: &str,
        secret: &str,
        pages: Vec<Vec<SecretRecord>>,
    ) -> Self {
        self.versions
            .insert((vault.to_string(), secret.to_string()), pages);
        self
    }

    /// The secret listing of `vault` never runs out of pages.
    pub fn endless(mut self, vault: &str) -> Self {
        self.endless.insert(vault.to_string());
        self
    }

    /// Listing the secrets of `vault` fails with an auth error.
    pub fn failing(mut self, vault: &str) -> Self {
        self.failing.insert(vault.to_string());
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

fn page_at<T: Clone>(pages: &[Vec<T>], cursor: Option<&str>) -> Page<T> {
    let index: usize = cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
    let items = pages.get(index).cloned().unwrap_or_default();
    let next = (index + 1 < pages.len()).then(|| (index + 1).to_string());
    Page { items, next }
}

#[async_trait]
impl SecretDirectory for FakeDirectory {
    async fn vault_page(&self, _account: &Account, cursor: Option<&str>) -> Result<Page<Vault>> {
        self.calls.vault_pages.fetch_add(1, Ordering::SeqCst);
        Ok(page_at(&self.vaults, cursor))
    }

    async fn secret_page(&self, vault: &Vault, cursor: Option<&str>) -> Result<Page<SecretRecord>> {
        let call = self.calls.secret_pages.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&vault.name) {
            return Err(RemoteError::Auth {
                url: vault.uri.clone(),
                status: 403,
                message: "forbidden".to_string(),
            }
            .into());
        }
        if self.endless.contains(&vault.name) {
            tokio::task::yield_now().await;
            return Ok(Page {
                items: vec![record(&format!("s{}", call), "latest")],
                next: Some(call.to_string()),
            });
        }
        let pages = self.secrets.get(&vault.name).map(Vec::as_slice).unwrap_or(&[]);
        Ok(page_at(pages, cursor))
    }

    async fn version_page(
        &self,
        vault: &Vault,
        name: &str,
        cursor: Option<&str>,
    ) -> Result<Page<SecretRecord>> {
        self.calls.version_pages.fetch_add(1, Ordering::SeqCst);
        let pages = self
            .versions
            .get(&(vault.name.clone(), name.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        Ok(page_at(pages, cursor))
    }

    async fn secret_value(
        &self,
        _vault: &Vault,
        name: &str,
        version: &Version,
    ) -> Result<Zeroizing<String>> {
        self.calls.values.fetch_add(1, Ordering::SeqCst);
        Ok(Zeroizing::new(format!("pw-{}-{}", name, version)))
    }
}

/// Reporter that remembers every acknowledgement as `(operation, secret ids)`.
#[derive(Default)]
pub struct RecordingReporter {
    acknowledged: Mutex<Vec<(Operation, Vec<String>)>>,
}

impl RecordingReporter {
    pub fn acknowledged(&self) -> Vec<(Operation, Vec<String>)> {
        self.acknowledged.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn acknowledge(&self, operation: Operation, secrets: &[Secret], _vaults: &VaultTable) {
        let ids = secrets.iter().map(|s| s.id().to_string()).collect();
        self.acknowledged.lock().unwrap().push((operation, ids));
    }
}
