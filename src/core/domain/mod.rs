//! Domain types.

mod operation;
mod secret;
mod vault;

pub use operation::{Operation, OperationInfo, OperationStack, OPERATIONS};
pub use secret::{Secret, SecretRecord, Version};
pub use vault::{Vault, VaultId, VaultTable};

use std::collections::BTreeMap;

/// Render tags as `{key:value,key:value}` in key order.
pub fn format_tags(tags: &BTreeMap<String, String>) -> String {
    let pairs: Vec<String> = tags.iter().map(|(k, v)| format!("{}:{}", k, v)).collect();
    format!("{{{}}}", pairs.join(","))
}
