//! Configuration file management.
//!
//! Handles reading and validating the optional `config.toml`. Every field has
//! a default, so a missing file is the same as an empty one.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// User configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote account and endpoint settings
    pub azure: AzureConfig,
    /// External picker settings
    pub picker: PickerConfig,
    /// Interactive session policies
    pub session: SessionConfig,
}

/// Remote account and endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AzureConfig {
    /// Subscription to enumerate vaults in; discovered via `az` when unset
    pub subscription: Option<String>,
    /// Resource Manager endpoint
    pub management_endpoint: String,
    /// api-version for the vault listing
    pub management_api_version: String,
    /// api-version for the secret data plane
    pub vault_api_version: String,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            subscription: None,
            management_endpoint: constants::MANAGEMENT_ENDPOINT.to_string(),
            management_api_version: constants::MANAGEMENT_API_VERSION.to_string(),
            vault_api_version: constants::VAULT_API_VERSION.to_string(),
        }
    }
}

/// External picker settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Picker binary (fzf-compatible command line)
    pub binary: String,
    /// Delimiter after the hidden identity field
    pub delimiter: String,
    /// Separator between visible columns
    pub separator: String,
    /// Capacity of the queues between stages
    pub buffer: usize,
    /// Extra arguments appended to every picker invocation
    pub extra_args: Vec<String>,
    /// Preview command for the secret picker (`{1}` is the secret id)
    pub preview: Option<String>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            binary: constants::DEFAULT_PICKER.to_string(),
            delimiter: constants::DEFAULT_DELIMITER.to_string(),
            separator: constants::DEFAULT_SEPARATOR.to_string(),
            buffer: constants::DEFAULT_BUFFER,
            extra_args: Vec::new(),
            preview: None,
        }
    }
}

/// Interactive session policies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// What to do when the operation menu commits nothing
    pub on_empty_operation: EmptyOperationPolicy,
}

/// Behaviour when the operation menu yields no selection.
///
/// A cancelled menu (ESC/Ctrl-C) always ends the session; this only covers a
/// query that matched nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyOperationPolicy {
    /// End the session cleanly
    #[default]
    Exit,
    /// Show the operation menu again for the same secrets
    Reprompt,
}

impl Config {
    /// Default config file location: `<config_dir>/asf/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join(constants::CONFIG_FILE))
    }

    /// Load configuration.
    ///
    /// An explicit path (flag or `ASF_CONFIG`) must exist; the default path is
    /// optional. `ASF_PICKER` overrides `picker.binary`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile`, `ConfigError::Parse` or a validation error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(constants::CONFIG_ENV).map(PathBuf::from);
        let explicit = explicit.map(Path::to_path_buf).or(from_env);

        let mut config = match explicit {
            Some(path) => {
                debug!(path = %path.display(), "loading config");
                let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
                Self::parse(&contents)?
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => {
                    debug!(path = %path.display(), "loading config");
                    let contents =
                        std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
                    Self::parse(&contents)?
                }
                _ => {
                    debug!("no config file, using defaults");
                    Self::default()
                }
            },
        };

        if let Ok(binary) = std::env::var(constants::PICKER_ENV) {
            if !binary.trim().is_empty() {
                debug!(binary = %binary, "picker overridden from environment");
                config.picker.binary = binary;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text without validating it.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        Ok(config)
    }

    /// Validate field values.
    ///
    /// Checks:
    /// - delimiter is non-empty and does not occur inside the separator
    /// - buffer is at least 1
    /// - picker binary is non-empty
    /// - management endpoint is an http(s) URL
    pub fn validate(&self) -> Result<()> {
        let picker = &self.picker;
        if picker.delimiter.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "picker.delimiter",
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        if picker.separator.contains(&picker.delimiter) {
            return Err(ConfigError::InvalidValue {
                field: "picker.separator",
                reason: format!("must not contain the delimiter {:?}", picker.delimiter),
            }
            .into());
        }
        if picker.buffer == 0 {
            return Err(ConfigError::InvalidValue {
                field: "picker.buffer",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        if picker.binary.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "picker.binary",
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        let endpoint = &self.azure.management_endpoint;
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(ConfigError::InvalidValue {
                field: "azure.management_endpoint",
                reason: format!("not an http(s) URL: {}", endpoint),
            }
            .into());
        }

        Ok(())
    }
}
