//! asf - fuzzy-pick Azure Key Vault secrets from the terminal.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── browse        # Interactive session (default command)
//! │   ├── vaults        # Static vault listing
//! │   ├── secrets       # Static secret listing
//! │   ├── completions   # Shell completions
//! │   └── output        # Terminal output helpers
//! └── core/             # Core library components
//!     ├── config        # config.toml loading
//!     ├── domain/       # Vaults, secrets, operations
//!     ├── pipeline/     # Scoped streaming stages and pagination
//!     ├── remote/       # Secret directory trait and Azure client
//!     ├── picker/       # Picker trait and fzf process
//!     ├── selector      # Stream-to-picker bridge
//!     ├── session       # Interactive state machine
//!     ├── display       # Picker line rendering
//!     └── table         # Aligned listings
//! ```
//!
//! # Features
//!
//! - Vaults and secrets stream into the picker while pages are still loading
//! - Operations chain: list versions, then fetch values of what you picked
//! - Secret values are zeroized on drop and never logged
//! - Every background task stops as soon as its output is no longer wanted

pub mod cli;
pub mod core;
pub mod error;
