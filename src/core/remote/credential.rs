//! Credentials via the Azure CLI.
//!
//! ## Requirements
//!
//! - `az` CLI must be installed and logged in (`az login`)
//!
//! Tokens are requested once per resource and kept for the process lifetime.

use std::collections::HashMap;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::core::constants;
use crate::error::{RemoteError, Result};

/// Source of bearer tokens for a resource audience.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn token(&self, resource: &str) -> Result<Zeroizing<String>>;
}

/// Token source backed by `az account get-access-token`.
pub struct AzCli {
    binary: String,
    cache: Mutex<HashMap<String, Zeroizing<String>>>,
}

impl AzCli {
    pub fn new() -> Self {
        Self::with_binary(constants::AZ_CLI)
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Subscription currently selected in the CLI.
    pub async fn default_subscription(&self) -> Result<String> {
        self.run(&["account", "show", "--query", "id", "--output", "tsv"])
            .await
    }

    /// Run the CLI and return trimmed, non-empty stdout.
    async fn run(&self, args: &[&str]) -> Result<String> {
        trace!(tool = %self.binary, ?args, "running credential tool");

        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| RemoteError::Credential {
                tool: self.binary.clone(),
                reason: if e.kind() == std::io::ErrorKind::NotFound {
                    "not installed or not in PATH".to_string()
                } else {
                    e.to_string()
                },
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RemoteError::Credential {
                tool: self.binary.clone(),
                reason: stderr.trim().to_string(),
            }
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if stdout.is_empty() {
            return Err(RemoteError::Credential {
                tool: self.binary.clone(),
                reason: format!("empty output from `{}`", args.join(" ")),
            }
            .into());
        }
        Ok(stdout)
    }
}

impl Default for AzCli {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenSource for AzCli {
    async fn token(&self, resource: &str) -> Result<Zeroizing<String>> {
        let mut cache = self.cache.lock().await;
        if let Some(token) = cache.get(resource) {
            return Ok(token.clone());
        }

        debug!(resource, "requesting access token");
        let token = Zeroizing::new(
            self.run(&[
                "account",
                "get-access-token",
                "--resource",
                resource,
                "--query",
                "accessToken",
                "--output",
                "tsv",
            ])
            .await?,
        );
        cache.insert(resource.to_string(), token.clone());
        Ok(token)
    }
}
