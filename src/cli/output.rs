//! Shared CLI output helpers.
//!
//! Color scheme (respects NO_COLOR):
//! - Red: errors
//! - Yellow: warnings
//! - Cyan: hints, vault and secret names
//! - Bold: headers, counts
//! - Dimmed: notices and secondary info
//!
//! Everything except listing data goes to stderr; stdout is reserved for
//! output meant to be piped.

use console::style;
use std::fmt::Display;

/// Check if color output is disabled via NO_COLOR env var.
fn colors_enabled() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Print an error message to stderr (red).
///
/// Example: `✗ picker 'fzf' is not installed or not in PATH`
pub fn error(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("✗").red().for_stderr(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// Print a warning message to stderr (yellow).
pub fn warn(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("⚠").yellow().for_stderr(), msg);
    } else {
        eprintln!("⚠ {}", msg);
    }
}

/// Print a hint message to stderr (cyan).
///
/// Example: `→ run: az login`
pub fn hint(msg: &str) {
    if colors_enabled() {
        eprintln!(
            "{} {}",
            style("→").cyan().for_stderr(),
            style(msg).cyan().for_stderr()
        );
    } else {
        eprintln!("→ {}", msg);
    }
}

/// Print a quiet notice to stderr, used for clean exits.
///
/// Example: `vault selection cancelled`
pub fn notice(msg: &str) {
    if colors_enabled() {
        eprintln!("{}", style(msg).dim().for_stderr());
    } else {
        eprintln!("{}", msg);
    }
}

/// Print a list item with bullet to stderr.
pub fn list_item(item: impl Display) {
    eprintln!("  • {}", item);
}

/// Print listing data to stdout, uncolored.
pub fn data(text: &str) {
    print!("{}", text);
    if !text.is_empty() && !text.ends_with('\n') {
        println!();
    }
}

/// Print a dimmed message to stderr.
///
/// Example: `no vaults found`
pub fn dimmed(msg: &str) {
    notice(msg);
}

/// Format a name in cyan for inline use.
pub fn name(n: &str) -> String {
    if colors_enabled() {
        style(n).cyan().for_stderr().to_string()
    } else {
        n.to_string()
    }
}

/// Format a count in bold for inline use.
pub fn count(n: usize) -> String {
    if colors_enabled() {
        style(n).bold().for_stderr().to_string()
    } else {
        n.to_string()
    }
}
