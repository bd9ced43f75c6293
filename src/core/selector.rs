//! Interactive selector.
//!
//! Bridges an [`ItemStream`] into a [`Picker`]. A forwarder task renders items
//! into picker lines as they arrive while a collector task gathers committed
//! lines; neither waits on the other. Committed lines are matched back to the
//! forwarded items through their identity field.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::core::display::Pickable;
use crate::core::picker::{identity, PickRequest, PickStatus, Picker, PickerOptions};
use crate::core::pipeline::{ItemStream, Scope};
use crate::error::{Error, Result};

/// Items chosen in one prompt.
#[derive(Debug)]
pub struct Selection<T> {
    /// Chosen items, in the order they were offered
    pub items: Vec<T>,
    /// Committed identities that matched no offered item
    pub unmatched: Vec<String>,
}

/// Result of one prompt.
#[derive(Debug)]
pub enum Choice<T> {
    /// User committed a selection
    Picked(Selection<T>),
    /// Nothing was chosen (empty commit or no match)
    Empty,
    /// User dismissed the prompt
    Cancelled,
}

/// Runs prompts on a picker within a scope.
#[derive(Clone)]
pub struct Selector {
    picker: Arc<dyn Picker>,
    scope: Scope,
}

impl Selector {
    pub fn new(picker: Arc<dyn Picker>, scope: Scope) -> Self {
        Self { picker, scope }
    }

    /// Offer `items` as they arrive and wait for the user's choice.
    ///
    /// An error from upstream tears the prompt down and is returned instead
    /// of a choice. Whatever the outcome, `items` is dropped before this
    /// returns, which stops the stages feeding it.
    pub async fn select<T, F>(
        &self,
        mut items: ItemStream<T>,
        render: F,
        options: &PickerOptions,
    ) -> Result<Choice<T>>
    where
        T: Pickable,
        F: Fn(&T) -> String + Send + 'static,
    {
        let (line_tx, line_rx) = mpsc::channel::<String>(self.scope.buffer());
        let (selected_tx, mut selected_rx) = mpsc::unbounded_channel::<String>();
        let abort = self.scope.token().child_token();

        let stop = abort.clone();
        let forwarder = tokio::spawn(async move {
            let mut seen = Vec::new();
            let mut failure = None;
            loop {
                // a prompt that already ended wins over a late upstream error
                let next = tokio::select! {
                    biased;
                    _ = stop.cancelled() => break,
                    next = items.next() => next,
                };
                match next {
                    Some(Ok(item)) => {
                        let line = render(&item);
                        seen.push(item);
                        let sent = tokio::select! {
                            biased;
                            _ = stop.cancelled() => false,
                            sent = line_tx.send(line) => sent.is_ok(),
                        };
                        if !sent {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        failure = Some(e);
                        stop.cancel();
                        break;
                    }
                    None => break,
                }
            }
            (seen, failure)
        });

        let collector = tokio::spawn(async move {
            let mut committed = Vec::new();
            while let Some(line) = selected_rx.recv().await {
                committed.push(line);
            }
            committed
        });

        let request = PickRequest {
            lines: line_rx,
            selected: selected_tx,
            abort: abort.clone(),
        };
        let status = self.picker.pick(request, options).await;

        // the prompt is over; release the upstream stream
        abort.cancel();
        let (seen, failure) = forwarder
            .await
            .map_err(|e| Error::Other(format!("picker forwarder failed: {}", e)))?;
        let committed = collector
            .await
            .map_err(|e| Error::Other(format!("picker collector failed: {}", e)))?;

        if let Some(e) = failure {
            return Err(e);
        }

        let status = status?;
        debug!(?status, offered = seen.len(), committed = committed.len(), "prompt finished");
        match status {
            PickStatus::Cancelled | PickStatus::Aborted => Ok(Choice::Cancelled),
            PickStatus::NoMatch => Ok(Choice::Empty),
            PickStatus::Committed => {
                let selection = resolve(seen, &committed, &options.delimiter);
                if selection.items.is_empty() && selection.unmatched.is_empty() {
                    Ok(Choice::Empty)
                } else {
                    Ok(Choice::Picked(selection))
                }
            }
        }
    }
}

/// Keep the offered items whose identity was committed.
pub fn resolve<T: Pickable>(seen: Vec<T>, committed: &[String], delimiter: &str) -> Selection<T> {
    let wanted: HashSet<&str> = committed
        .iter()
        .map(|line| identity(line, delimiter))
        .collect();

    let mut matched = HashSet::new();
    let mut items = Vec::new();
    for item in seen {
        if wanted.contains(item.identity()) && matched.insert(item.identity().to_string()) {
            items.push(item);
        }
    }

    let mut unmatched: Vec<String> = wanted
        .into_iter()
        .filter(|id| !matched.contains(*id))
        .map(str::to_string)
        .collect();
    unmatched.sort();
    // committed lines may carry secret values; only the count is logged
    if !unmatched.is_empty() {
        warn!(count = unmatched.len(), "committed lines matched no offered item");
    }

    Selection { items, unmatched }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::Operation;

    #[test]
    fn test_resolve_keeps_offer_order_and_dedups() {
        let seen = vec![
            Operation::ListVersions,
            Operation::GetPasswords,
            Operation::DeleteSecret,
        ];
        let committed = vec![
            "delete-secret|Delete".to_string(),
            "list-versions|List".to_string(),
            "list-versions|List".to_string(),
        ];

        let selection = resolve(seen, &committed, "|");
        assert_eq!(
            selection.items,
            vec![Operation::ListVersions, Operation::DeleteSecret]
        );
        assert!(selection.unmatched.is_empty());
    }

    #[test]
    fn test_resolve_reports_unknown_identities() {
        let selection = resolve(
            vec![Operation::EditMetaData],
            &["rename|Rename things".to_string()],
            "|",
        );
        assert!(selection.items.is_empty());
        assert_eq!(selection.unmatched, vec!["rename".to_string()]);
    }

    /// Commits the first line, then fails the upstream before returning.
    struct CommitThenFail {
        upstream: std::sync::Mutex<Option<crate::core::pipeline::Emitter<Operation>>>,
    }

    #[async_trait::async_trait]
    impl Picker for CommitThenFail {
        fn ensure_available(&self) -> Result<()> {
            Ok(())
        }

        async fn pick(&self, mut request: PickRequest, _: &PickerOptions) -> Result<PickStatus> {
            if let Some(line) = request.lines.recv().await {
                request.selected.send(line).unwrap();
            }
            let upstream = self.upstream.lock().unwrap().take().unwrap();
            upstream.fail(Error::Other("late failure".to_string())).await;
            Ok(PickStatus::Committed)
        }
    }

    #[tokio::test]
    async fn test_commit_wins_over_late_upstream_error() {
        let scope = Scope::new(4);
        let (emitter, stream) = scope.channel();
        assert!(emitter.emit(Operation::GetPasswords).await);

        let picker = Arc::new(CommitThenFail {
            upstream: std::sync::Mutex::new(Some(emitter)),
        });
        let selector = Selector::new(picker, scope.clone());
        let options = PickerOptions {
            delimiter: "|".to_string(),
            ..PickerOptions::default()
        };
        let choice = selector
            .select(stream, |op: &Operation| format!("{}|x", op.name()), &options)
            .await
            .unwrap();
        scope.shutdown().await;

        match choice {
            Choice::Picked(selection) => {
                assert_eq!(selection.items, vec![Operation::GetPasswords]);
            }
            other => panic!("expected a pick, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_multiline_value_resolves_to_one_item() {
        use std::collections::BTreeMap;
        use std::os::unix::fs::PermissionsExt;

        use zeroize::Zeroizing;

        use crate::core::display::LineFormat;
        use crate::core::domain::{Secret, SecretRecord, Vault, VaultTable, Version};
        use crate::core::picker::Fzf;

        // stand-in picker that commits every candidate line
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("picker.sh");
        std::fs::write(&path, "#!/bin/sh\ncat\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        let picker: Arc<dyn Picker> = Arc::new(Fzf::new(path.display().to_string()));

        let vaults = VaultTable::new(vec![Vault {
            id: "v1".to_string(),
            name: "alpha".to_string(),
            tags: BTreeMap::new(),
            location: "westeurope".to_string(),
            tenant_id: "t1".to_string(),
            uri: "https://alpha.vault.test/".to_string(),
        }]);
        let (id, vault) = vaults.iter().next().unwrap();
        let record = SecretRecord {
            name: "cert".to_string(),
            version: Version::Latest,
            tags: BTreeMap::new(),
            enabled: true,
            created: None,
            content_type: None,
            managed: false,
        };
        let pem = "-----BEGIN-----\nMIIB\n-----END-----";
        let secret = Secret::new(id, vault, record).with_value(Zeroizing::new(pem.to_string()));

        let scope = Scope::new(4);
        let selector = Selector::new(picker, scope.clone());
        let format = LineFormat::new("|", " / ");
        let options = PickerOptions {
            delimiter: "|".to_string(),
            ..PickerOptions::default()
        };
        let table = vaults.clone();
        let choice = selector
            .select(
                scope.replay(vec![secret.clone()]),
                move |s: &Secret| format.secret(s, &table),
                &options,
            )
            .await
            .unwrap();
        scope.shutdown().await;

        match choice {
            Choice::Picked(selection) => {
                assert_eq!(selection.items, vec![secret]);
                assert!(selection.unmatched.is_empty());
            }
            other => panic!("expected a pick, got {:?}", other),
        }
    }
}
