//! Azure Key Vault directory.
//!
//! Vaults are listed through Resource Manager, secrets through each vault's
//! data-plane endpoint. Both APIs page with a `nextLink` URL, which is used
//! verbatim as the cursor.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::{Account, SecretDirectory, TokenSource};
use crate::core::config::AzureConfig;
use crate::core::constants;
use crate::core::domain::{SecretRecord, Vault, Version};
use crate::core::pipeline::Page;
use crate::error::{RemoteError, Result};

/// [`SecretDirectory`] over the Azure REST APIs.
pub struct AzureDirectory {
    http: reqwest::Client,
    tokens: Arc<dyn TokenSource>,
    management_endpoint: String,
    management_api_version: String,
    vault_api_version: String,
}

impl AzureDirectory {
    pub fn new(config: &AzureConfig, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            http: reqwest::Client::new(),
            tokens,
            management_endpoint: config.management_endpoint.trim_end_matches('/').to_string(),
            management_api_version: config.management_api_version.clone(),
            vault_api_version: config.vault_api_version.clone(),
        }
    }

    /// GET `url` with a token for `resource` and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str, resource: &str) -> Result<T> {
        let token = self.tokens.token(resource).await?;
        debug!(url, "GET");

        let response = self
            .http
            .get(url)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(|source| RemoteError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        trace!(url, status = status.as_u16(), "response");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(url, status.as_u16(), &body).into());
        }

        let body = response.text().await.map_err(|source| RemoteError::Transport {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|e| {
            RemoteError::Decode {
                url: url.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn data_plane_url(&self, vault: &Vault, path: &str) -> String {
        format!(
            "{}/{}?api-version={}",
            vault.uri.trim_end_matches('/'),
            path,
            self.vault_api_version
        )
    }

    async fn secret_listing(&self, url: &str) -> Result<Page<SecretRecord>> {
        let listing: Listing<SecretItem> = self.get_json(url, constants::VAULT_RESOURCE).await?;
        let items = listing
            .value
            .into_iter()
            .map(|item| item.into_record(url))
            .collect::<Result<Vec<_>>>()?;
        Ok(Page {
            items,
            next: listing.next_link.filter(|link| !link.is_empty()),
        })
    }
}

#[async_trait]
impl SecretDirectory for AzureDirectory {
    async fn vault_page(&self, account: &Account, cursor: Option<&str>) -> Result<Page<Vault>> {
        let url = match cursor {
            Some(next) => next.to_string(),
            None => format!(
                "{}/subscriptions/{}/providers/Microsoft.KeyVault/vaults?api-version={}",
                self.management_endpoint, account.subscription, self.management_api_version
            ),
        };
        let listing: Listing<VaultResource> =
            self.get_json(&url, &self.management_endpoint).await?;

        Ok(Page {
            items: listing.value.into_iter().map(VaultResource::into_vault).collect(),
            next: listing.next_link.filter(|link| !link.is_empty()),
        })
    }

    async fn secret_page(&self, vault: &Vault, cursor: Option<&str>) -> Result<Page<SecretRecord>> {
        let url = match cursor {
            Some(next) => next.to_string(),
            None => self.data_plane_url(vault, "secrets"),
        };
        self.secret_listing(&url).await
    }

    async fn version_page(
        &self,
        vault: &Vault,
        name: &str,
        cursor: Option<&str>,
    ) -> Result<Page<SecretRecord>> {
        let url = match cursor {
            Some(next) => next.to_string(),
            None => self.data_plane_url(vault, &format!("secrets/{}/versions", name)),
        };
        self.secret_listing(&url).await
    }

    async fn secret_value(
        &self,
        vault: &Vault,
        name: &str,
        version: &Version,
    ) -> Result<Zeroizing<String>> {
        let url = self.data_plane_url(vault, &format!("secrets/{}/{}", name, version.wire()));
        let bundle: SecretBundle = self.get_json(&url, constants::VAULT_RESOURCE).await?;
        bundle.value.map(Zeroizing::new).ok_or_else(|| {
            RemoteError::Decode {
                url,
                reason: "secret bundle has no value".to_string(),
            }
            .into()
        })
    }
}

/// Map a failed response onto the remote error taxonomy.
fn status_error(url: &str, status: u16, body: &str) -> RemoteError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .map(|e| e.message)
        .unwrap_or_else(|| body.trim().to_string());
    let url = url.to_string();

    match status {
        401 | 403 => RemoteError::Auth {
            url,
            status,
            message,
        },
        404 => RemoteError::NotFound { url, message },
        _ => RemoteError::Status {
            url,
            status,
            message,
        },
    }
}

/// Split `https://{vault}/secrets/{name}[/{version}]` into name and version.
fn parse_secret_id(id: &str) -> Option<(String, Version)> {
    let (_, rest) = id.split_once("/secrets/")?;
    let mut parts = rest.trim_end_matches('/').splitn(2, '/');
    let name = parts.next().filter(|n| !n.is_empty())?;
    let version = Version::parse(parts.next().unwrap_or(""));
    Some((name.to_string(), version))
}

fn present_tags(tags: BTreeMap<String, Option<String>>) -> BTreeMap<String, String> {
    tags.into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v)))
        .collect()
}

#[derive(Deserialize)]
struct Listing<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
    #[serde(rename = "nextLink", default)]
    next_link: Option<String>,
}

#[derive(Deserialize)]
struct VaultResource {
    id: String,
    name: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    tags: Option<BTreeMap<String, Option<String>>>,
    #[serde(default)]
    properties: VaultProperties,
}

#[derive(Deserialize, Default)]
struct VaultProperties {
    #[serde(rename = "tenantId", default)]
    tenant_id: Option<String>,
    #[serde(rename = "vaultUri", default)]
    vault_uri: Option<String>,
}

impl VaultResource {
    fn into_vault(self) -> Vault {
        let uri = self
            .properties
            .vault_uri
            .unwrap_or_else(|| format!("https://{}.vault.azure.net/", self.name));
        Vault {
            id: self.id,
            name: self.name,
            tags: present_tags(self.tags.unwrap_or_default()),
            location: self.location.unwrap_or_default(),
            tenant_id: self.properties.tenant_id.unwrap_or_default(),
            uri,
        }
    }
}

#[derive(Deserialize)]
struct SecretItem {
    id: String,
    #[serde(default)]
    attributes: Attributes,
    #[serde(default)]
    tags: Option<BTreeMap<String, Option<String>>>,
    #[serde(rename = "contentType", default)]
    content_type: Option<String>,
    #[serde(default)]
    managed: bool,
}

#[derive(Deserialize, Default)]
struct Attributes {
    #[serde(default)]
    enabled: Option<bool>,
    /// Unix seconds
    #[serde(default)]
    created: Option<i64>,
}

impl SecretItem {
    fn into_record(self, url: &str) -> Result<SecretRecord> {
        let (name, version) = parse_secret_id(&self.id).ok_or_else(|| RemoteError::Decode {
            url: url.to_string(),
            reason: format!("malformed secret id: {}", self.id),
        })?;
        Ok(SecretRecord {
            name,
            version,
            tags: present_tags(self.tags.unwrap_or_default()),
            enabled: self.attributes.enabled.unwrap_or(false),
            created: self
                .attributes
                .created
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
            content_type: self.content_type,
            managed: self.managed,
        })
    }
}

#[derive(Deserialize)]
struct SecretBundle {
    #[serde(default)]
    value: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}
