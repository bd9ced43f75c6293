//! Interactive fuzzy picker.
//!
//! The picker is an external, opaque UI. It reads candidate lines from a
//! channel while the user is already typing and reports the committed lines
//! on another channel. Each line starts with an identity field followed by
//! the configured delimiter; the options decide how much of it is shown.

mod fzf;

pub use fzf::Fzf;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::Result;

/// Recognized picker options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickerOptions {
    /// Prompt shown in front of the query
    pub prompt: String,
    /// Allow selecting more than one line
    pub multi: bool,
    /// Field delimiter inside a line
    pub delimiter: String,
    /// Number of leading fields hidden from display
    pub hidden_fields: usize,
    /// Static header text
    pub header: Option<String>,
    /// Number of leading input lines treated as a header
    pub header_lines: usize,
    /// Preview command
    pub preview: Option<String>,
}

/// Channels handed to the picker for one prompt.
pub struct PickRequest {
    /// Candidate lines; closed when the producer has no more
    pub lines: mpsc::Receiver<String>,
    /// Committed lines are sent here
    pub selected: mpsc::UnboundedSender<String>,
    /// Cancelled when the prompt must be torn down early
    pub abort: CancellationToken,
}

/// How a prompt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickStatus {
    /// User accepted the current selection
    Committed,
    /// Query matched nothing
    NoMatch,
    /// User dismissed the prompt (ESC, Ctrl-C)
    Cancelled,
    /// Torn down through [`PickRequest::abort`]
    Aborted,
}

/// An interactive picker.
#[async_trait]
pub trait Picker: Send + Sync {
    /// Fail early if the picker cannot run at all.
    fn ensure_available(&self) -> Result<()>;

    /// Run one prompt until the user commits or cancels.
    async fn pick(&self, request: PickRequest, options: &PickerOptions) -> Result<PickStatus>;
}

/// Identity field of a picker line.
pub fn identity<'a>(line: &'a str, delimiter: &str) -> &'a str {
    line.split_once(delimiter).map_or(line, |(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_leading_field() {
        assert_eq!(identity("v1|alpha / {}", "|"), "v1");
        assert_eq!(identity("get-passwords|Get|passwords", "|"), "get-passwords");
        assert_eq!(identity("no-delimiter", "|"), "no-delimiter");
        assert_eq!(identity("a\tb", "\t"), "a");
    }
}
