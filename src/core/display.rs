//! Picker line rendering.
//!
//! Every line is `{identity}{delimiter}{column}{separator}{column}...`. The
//! identity field is what a committed line is matched back by, so it must be
//! unique per item and must not contain the delimiter or control characters.
//! The picker reads one record per line, so control characters in the
//! columns are escaped.

use crate::core::constants::{MASK, TIME_FORMAT};
use crate::core::domain::{format_tags, Operation, Secret, Vault, VaultTable};

/// Something that can be offered in the picker.
pub trait Pickable: Send + 'static {
    /// Stable, unique identity rendered as the first field.
    fn identity(&self) -> &str;
}

impl Pickable for Vault {
    fn identity(&self) -> &str {
        &self.id
    }
}

impl Pickable for Secret {
    fn identity(&self) -> &str {
        self.id()
    }
}

impl Pickable for Operation {
    fn identity(&self) -> &str {
        self.name()
    }
}

/// Delimiter and separator used for picker lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFormat {
    pub delimiter: String,
    pub separator: String,
}

impl LineFormat {
    pub fn new(delimiter: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            separator: separator.into(),
        }
    }

    fn line(&self, identity: &str, columns: &[String]) -> String {
        let columns: Vec<String> = columns.iter().map(|c| flatten(c)).collect();
        format!(
            "{}{}{}",
            identity,
            self.delimiter,
            columns.join(&self.separator)
        )
    }

    /// `id | name / tags / tenant`
    pub fn vault(&self, vault: &Vault) -> String {
        self.line(
            &vault.id,
            &[
                vault.name.clone(),
                format_tags(&vault.tags),
                vault.tenant_id.clone(),
            ],
        )
    }

    /// `id | name / value / version / vault / tags / {created:..} / {enabled:..}`
    pub fn secret(&self, secret: &Secret, vaults: &VaultTable) -> String {
        let vault = vaults
            .get(secret.vault)
            .map(|v| v.name.clone())
            .unwrap_or_default();
        let created = secret
            .created
            .map(|c| c.format(TIME_FORMAT).to_string())
            .unwrap_or_default();

        self.line(
            secret.id(),
            &[
                secret.name.clone(),
                secret.value().unwrap_or(MASK).to_string(),
                secret.version.to_string(),
                vault,
                format_tags(&secret.tags),
                format!("{{created:{}}}", created),
                format!("{{enabled:{}}}", secret.enabled),
            ],
        )
    }

    /// `name | description`
    pub fn operation(&self, operation: &Operation) -> String {
        self.line(operation.name(), &[operation.description().to_string()])
    }
}

/// Escape line breaks, tabs and other control characters.
fn flatten(field: &str) -> String {
    if !field.chars().any(char::is_control) {
        return field.to_string();
    }
    let mut out = String::with_capacity(field.len() + 8);
    for c in field.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.extend(c.escape_unicode()),
            c => out.push(c),
        }
    }
    out
}
