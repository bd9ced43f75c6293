//! Scripted picker.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use asf::core::picker::{identity, PickRequest, PickStatus, Picker, PickerOptions};
use asf::error::Result;

/// What the picker does at one prompt.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Read every line, then commit those whose identity is listed
    Commit(Vec<String>),
    /// Commit these raw lines without reading any input
    Raw(Vec<String>),
    /// Dismiss the prompt without reading any input
    Cancel,
    /// Read up to `n` lines, then dismiss the prompt
    CancelAfter(usize),
    /// Read every line, then report that nothing matched
    NoMatch,
}

impl Reply {
    pub fn commit(ids: &[&str]) -> Self {
        Reply::Commit(ids.iter().map(|s| s.to_string()).collect())
    }
}

/// One prompt as the picker saw it.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub options: PickerOptions,
    pub lines: Vec<String>,
}

impl Prompt {
    /// Identity field of every line read.
    pub fn ids(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|l| identity(l, &self.options.delimiter).to_string())
            .collect()
    }
}

/// [`Picker`] that follows a script, one reply per prompt.
///
/// Once the script runs out every further prompt is cancelled.
pub struct ScriptedPicker {
    replies: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<Prompt>>,
}

impl ScriptedPicker {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every prompt shown so far, in order.
    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Picker for ScriptedPicker {
    fn ensure_available(&self) -> Result<()> {
        Ok(())
    }

    async fn pick(&self, request: PickRequest, options: &PickerOptions) -> Result<PickStatus> {
        let PickRequest {
            mut lines,
            selected,
            abort,
        } = request;
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Reply::Cancel);

        let limit = match &reply {
            Reply::Raw(_) | Reply::Cancel => 0,
            Reply::CancelAfter(n) => *n,
            Reply::Commit(_) | Reply::NoMatch => usize::MAX,
        };

        let mut seen = Vec::new();
        let mut aborted = false;
        while seen.len() < limit {
            tokio::select! {
                _ = abort.cancelled() => {
                    aborted = true;
                    break;
                }
                line = lines.recv() => match line {
                    Some(line) => seen.push(line),
                    None => break,
                },
            }
        }
        drop(lines);

        self.prompts.lock().unwrap().push(Prompt {
            options: options.clone(),
            lines: seen.clone(),
        });
        if aborted {
            return Ok(PickStatus::Aborted);
        }

        match reply {
            Reply::Commit(ids) => {
                for line in seen {
                    if ids.iter().any(|id| id == identity(&line, &options.delimiter)) {
                        let _ = selected.send(line);
                    }
                }
                Ok(PickStatus::Committed)
            }
            Reply::Raw(raw) => {
                for line in raw {
                    let _ = selected.send(line);
                }
                Ok(PickStatus::Committed)
            }
            Reply::Cancel | Reply::CancelAfter(_) => Ok(PickStatus::Cancelled),
            Reply::NoMatch => Ok(PickStatus::NoMatch),
        }
    }
}
