//! fzf picker.
//!
//! Runs `fzf` (or a compatible binary) as a child process. Candidate lines
//! are written to its stdin as they arrive; the UI is drawn on the terminal;
//! committed lines come back on stdout.
//!
//! Exit statuses: 0 committed, 1 no match, 130 interrupted.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{ChildStdin, ChildStdout, Command};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use super::{PickRequest, PickStatus, Picker, PickerOptions};
use crate::core::config::PickerConfig;
use crate::core::constants::{PICKER_INTERRUPTED, PICKER_NO_MATCH};
use crate::error::{PickerError, Result};

/// fzf-compatible picker process.
pub struct Fzf {
    binary: String,
    extra_args: Vec<String>,
}

impl Fzf {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            extra_args: Vec::new(),
        }
    }

    pub fn from_config(config: &PickerConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            extra_args: config.extra_args.clone(),
        }
    }

    /// Command-line arguments for `options`.
    pub fn args(&self, options: &PickerOptions) -> Vec<String> {
        let mut args = vec![
            "--layout=reverse".to_string(),
            "--info=inline".to_string(),
            "--border".to_string(),
        ];
        if options.multi {
            args.push("--multi".to_string());
        }
        if !options.delimiter.is_empty() {
            args.push(format!("--delimiter={}", quote_meta(&options.delimiter)));
        }
        if options.hidden_fields > 0 {
            args.push(format!("--with-nth={}..", options.hidden_fields + 1));
        }
        if !options.prompt.is_empty() {
            args.push(format!("--prompt={}", options.prompt));
        }
        if let Some(header) = &options.header {
            args.push(format!("--header={}", header));
        }
        if options.header_lines > 0 {
            args.push(format!("--header-lines={}", options.header_lines));
        }
        if let Some(preview) = &options.preview {
            args.push(format!("--preview={}", preview));
        }
        args.extend(self.extra_args.iter().cloned());
        args
    }
}

#[async_trait]
impl Picker for Fzf {
    fn ensure_available(&self) -> Result<()> {
        which::which(&self.binary).map_err(|_| PickerError::NotInstalled(self.binary.clone()))?;
        Ok(())
    }

    async fn pick(&self, request: PickRequest, options: &PickerOptions) -> Result<PickStatus> {
        let PickRequest {
            lines,
            selected,
            abort,
        } = request;

        let args = self.args(options);
        debug!(binary = %self.binary, ?args, "launching picker");

        // the UI itself goes to the terminal through stderr
        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| PickerError::Launch {
                binary: self.binary.clone(),
                source,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| PickerError::Io(std::io::Error::other("picker stdin unavailable")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| PickerError::Io(std::io::Error::other("picker stdout unavailable")))?;

        let writer = tokio::spawn(feed(stdin, lines));
        let reader = tokio::spawn(collect(stdout, selected));

        let status = tokio::select! {
            status = child.wait() => status.map_err(PickerError::Io)?,
            _ = abort.cancelled() => {
                debug!("picker aborted");
                writer.abort();
                reader.abort();
                child.kill().await.map_err(PickerError::Io)?;
                return Ok(PickStatus::Aborted);
            }
        };

        // the picker is gone; stop waiting for more candidates
        writer.abort();
        if let Err(e) = reader.await {
            debug!(error = %e, "picker output reader ended early");
        }

        let code = status.code().unwrap_or(PICKER_INTERRUPTED);
        debug!(code, "picker exited");
        match code {
            0 => Ok(PickStatus::Committed),
            PICKER_NO_MATCH => Ok(PickStatus::NoMatch),
            PICKER_INTERRUPTED => Ok(PickStatus::Cancelled),
            other => Err(PickerError::Failed(other).into()),
        }
    }
}

/// Escape regex metacharacters.
///
/// fzf reads a delimiter containing any of them as a regular expression, and
/// a bare `|` would then match between every character.
fn quote_meta(delimiter: &str) -> String {
    let mut out = String::with_capacity(delimiter.len() * 2);
    for c in delimiter.chars() {
        if "\\.+*?()|[]{}^$".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Write candidate lines to the picker until either side closes.
async fn feed(mut stdin: ChildStdin, mut lines: mpsc::Receiver<String>) {
    let mut written = 0usize;
    while let Some(line) = lines.recv().await {
        let mut buf = line.into_bytes();
        buf.push(b'\n');
        if stdin.write_all(&buf).await.is_err() {
            break;
        }
        written += 1;
    }
    trace!(written, "picker input closed");
}

/// Forward every committed line.
async fn collect(stdout: ChildStdout, selected: mpsc::UnboundedSender<String>) {
    let mut lines = BufReader::new(stdout).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if selected.send(line).is_err() {
            break;
        }
    }
}
