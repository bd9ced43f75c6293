//! Constants used throughout asf.
//!
//! Centralizes magic strings and default configuration values.

/// Config directory name under the platform config dir.
pub const CONFIG_DIR: &str = "asf";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the config file path.
pub const CONFIG_ENV: &str = "ASF_CONFIG";

/// Environment variable overriding the picker binary.
pub const PICKER_ENV: &str = "ASF_PICKER";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "ASF_LOG";

/// Default picker binary.
pub const DEFAULT_PICKER: &str = "fzf";

/// Field delimiter between the hidden identity field and the display columns.
pub const DEFAULT_DELIMITER: &str = "|";

/// Visual separator between display columns.
pub const DEFAULT_SEPARATOR: &str = " / ";

/// Capacity of the bounded queues between pipeline stages.
pub const DEFAULT_BUFFER: usize = 16;

/// Version sentinel shown for the floating "most recent" pointer.
pub const LATEST: &str = "latest";

/// Placeholder rendered for a secret whose value was not fetched.
pub const MASK: &str = "******";

/// Timestamp format used in listings and picker lines.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Azure Resource Manager endpoint.
pub const MANAGEMENT_ENDPOINT: &str = "https://management.azure.com";

/// Token audience for the Key Vault data plane.
pub const VAULT_RESOURCE: &str = "https://vault.azure.net";

/// ARM api-version for `Microsoft.KeyVault/vaults`.
pub const MANAGEMENT_API_VERSION: &str = "2023-07-01";

/// Key Vault data-plane api-version.
pub const VAULT_API_VERSION: &str = "7.4";

/// Azure CLI binary used for tokens and subscription discovery.
pub const AZ_CLI: &str = "az";

/// fzf exit status when nothing matched the query.
pub const PICKER_NO_MATCH: i32 = 1;

/// fzf exit status when interrupted with ESC or Ctrl-C.
pub const PICKER_INTERRUPTED: i32 = 130;
