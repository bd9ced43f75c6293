//! Secret type.
//!
//! One version of a named secret inside a vault. The value is only present
//! after it has been fetched explicitly and is wiped from memory on drop.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use zeroize::Zeroizing;

use super::vault::{Vault, VaultId};
use crate::core::constants::LATEST;

/// Secret version.
///
/// `Latest` is the floating pointer to whatever is current. It has no
/// concrete identity, so it never compares equal to an `Id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Version {
    Latest,
    Id(String),
}

impl Version {
    /// Parse a version string; empty or `latest` is the floating pointer.
    pub fn parse(version: &str) -> Self {
        if version.is_empty() || version == LATEST {
            Self::Latest
        } else {
            Self::Id(version.to_string())
        }
    }

    pub fn is_latest(&self) -> bool {
        matches!(self, Self::Latest)
    }

    /// Concrete version id, if resolved.
    pub fn concrete(&self) -> Option<&str> {
        match self {
            Self::Latest => None,
            Self::Id(id) => Some(id),
        }
    }

    /// Version path segment sent on the wire; empty means "most recent".
    pub fn wire(&self) -> &str {
        self.concrete().unwrap_or("")
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "{}", LATEST),
            Self::Id(id) => write!(f, "{}", id),
        }
    }
}

/// Secret attributes as returned by the directory, before they are tied to a
/// vault of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretRecord {
    pub name: String,
    pub version: Version,
    pub tags: BTreeMap<String, String>,
    pub enabled: bool,
    pub created: Option<DateTime<Utc>>,
    pub content_type: Option<String>,
    pub managed: bool,
}

/// A secret version bound to the vault it lives in.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret {
    id: String,
    /// Owning vault
    pub vault: VaultId,
    pub name: String,
    pub version: Version,
    pub tags: BTreeMap<String, String>,
    pub enabled: bool,
    pub created: Option<DateTime<Utc>>,
    pub content_type: Option<String>,
    pub managed: bool,
    value: Option<Zeroizing<String>>,
}

impl Secret {
    /// Bind a record to its vault. The id is `{vault id}.{name}.{version}`.
    pub fn new(vault_id: VaultId, vault: &Vault, record: SecretRecord) -> Self {
        Self {
            id: format!("{}.{}.{}", vault.id, record.name, record.version),
            vault: vault_id,
            name: record.name,
            version: record.version,
            tags: record.tags,
            enabled: record.enabled,
            created: record.created,
            content_type: record.content_type,
            managed: record.managed,
            value: None,
        }
    }

    /// Unique per vault, name and version.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Fetched value, if any.
    pub fn value(&self) -> Option<&str> {
        self.value.as_ref().map(|v| v.as_str())
    }

    pub fn has_value(&self) -> bool {
        self.value.is_some()
    }

    /// Attach a fetched value.
    pub fn with_value(mut self, value: Zeroizing<String>) -> Self {
        self.value = Some(value);
        self
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("id", &self.id)
            .field("vault", &self.vault)
            .field("name", &self.name)
            .field("version", &self.version)
            .field("enabled", &self.enabled)
            .field("value", &self.value.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
