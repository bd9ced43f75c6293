//! Error types.
//!
//! One crate-level [`Error`] with nested domain errors. Picker cancellation and
//! empty selections are modelled as errors too, so they travel up to `main`
//! through `?` like everything else, but they map to a clean exit.

use std::fmt;

use thiserror::Error;

/// Interactive stage a clean exit happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Vaults,
    Secrets,
    Operation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Vaults => write!(f, "vault"),
            Stage::Secrets => write!(f, "secret"),
            Stage::Operation => write!(f, "operation"),
        }
    }
}

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Picker(#[from] PickerError),

    /// Picker was dismissed with ESC or Ctrl-C.
    #[error("{stage} selection cancelled")]
    Cancelled { stage: Stage },

    /// Picker committed without choosing anything.
    #[error("no {stage} selected")]
    NoSelection { stage: Stage },

    /// Menu line did not map back to a known operation.
    #[error("unknown operation: {0:?}")]
    UnknownOperation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error ends the session the way a user intended.
    pub fn is_clean_exit(&self) -> bool {
        matches!(self, Error::Cancelled { .. } | Error::NoSelection { .. })
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        if self.is_clean_exit() {
            0
        } else {
            1
        }
    }
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("no subscription configured and none could be discovered")]
    NoSubscription,
}

/// Errors talking to the vault directory or its credential source.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("not authorized for {url} (HTTP {status}): {message}")]
    Auth {
        url: String,
        status: u16,
        message: String,
    },

    #[error("not found: {url}: {message}")]
    NotFound { url: String, message: String },

    #[error("HTTP {status} from {url}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("credential tool '{tool}' failed: {reason}")]
    Credential { tool: String, reason: String },
}

/// Errors driving the external picker.
#[derive(Error, Debug)]
pub enum PickerError {
    #[error("picker '{0}' is not installed or not in PATH")]
    NotInstalled(String),

    #[error("failed to start picker '{binary}': {source}")]
    Launch {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("picker i/o failed: {0}")]
    Io(#[source] std::io::Error),

    #[error("picker exited with status {0}")]
    Failed(i32),
}

pub type Result<T> = std::result::Result<T, Error>;
