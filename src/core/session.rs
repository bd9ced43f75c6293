//! Session controller.
//!
//! Drives the interactive loop:
//!
//! ```text
//! SelectingVaults -> StreamingSecrets -> SelectingSecrets -> SelectingOperation
//!                                              ^                    |
//!                                              |                    v
//!                                              +------------ ApplyingOperation
//! ```
//!
//! The loop only ends through an error. Cancelling or committing nothing
//! surfaces as [`Error::Cancelled`] / [`Error::NoSelection`], which callers
//! treat as a clean exit.

use std::sync::Arc;

use tracing::{debug, info};

use crate::core::config::{Config, EmptyOperationPolicy};
use crate::core::display::{LineFormat, Pickable};
use crate::core::domain::{Operation, OperationStack, Secret, Vault, VaultTable};
use crate::core::picker::{Picker, PickerOptions};
use crate::core::pipeline::{
    self, paginate, FetchValues, ItemStream, ListSecrets, ListVersions, Scope,
};
use crate::core::remote::{Account, SecretDirectory};
use crate::core::selector::{Choice, Selection, Selector};
use crate::error::{Error, Result, Stage};

/// Receives operations that only acknowledge the selection.
pub trait Reporter: Send + Sync {
    /// `operation` was chosen for `secrets`; nothing was changed remotely.
    fn acknowledge(&self, operation: Operation, secrets: &[Secret], vaults: &VaultTable);
}

/// Session settings taken from the configuration.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub format: LineFormat,
    pub buffer: usize,
    pub preview: Option<String>,
    pub on_empty_operation: EmptyOperationPolicy,
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            format: LineFormat::new(&config.picker.delimiter, &config.picker.separator),
            buffer: config.picker.buffer,
            preview: config.picker.preview.clone(),
            on_empty_operation: config.session.on_empty_operation,
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

enum State {
    SelectingVaults,
    StreamingSecrets(Vec<Vault>),
    SelectingSecrets(ItemStream<Secret>),
    SelectingOperation(Vec<Secret>),
    ApplyingOperation(Operation, Vec<Secret>),
}

/// One interactive browsing session.
pub struct Session {
    directory: Arc<dyn SecretDirectory>,
    selector: Selector,
    reporter: Arc<dyn Reporter>,
    scope: Scope,
    account: Account,
    options: SessionOptions,
    vaults: VaultTable,
    stack: OperationStack,
}

impl Session {
    pub fn new(
        directory: Arc<dyn SecretDirectory>,
        picker: Arc<dyn Picker>,
        reporter: Arc<dyn Reporter>,
        account: Account,
        options: SessionOptions,
    ) -> Self {
        let scope = Scope::new(options.buffer);
        Self {
            directory,
            selector: Selector::new(picker, scope.clone()),
            reporter,
            scope,
            account,
            options,
            vaults: VaultTable::default(),
            stack: OperationStack::new(),
        }
    }

    /// Operations applied so far.
    pub fn stack(&self) -> &OperationStack {
        &self.stack
    }

    /// Run until the user cancels or an error occurs.
    ///
    /// Every worker started by the session has exited when this returns.
    pub async fn run(&mut self) -> Result<()> {
        let result = self.drive().await;
        self.scope.shutdown().await;
        debug!(operations = self.stack.len(), "session ended");
        result
    }

    async fn drive(&mut self) -> Result<()> {
        let mut state = State::SelectingVaults;
        loop {
            state = match state {
                State::SelectingVaults => {
                    let vaults = self.select_vaults().await?;
                    State::StreamingSecrets(vaults)
                }
                State::StreamingSecrets(vaults) => {
                    info!(vaults = vaults.len(), "streaming secrets");
                    self.vaults = VaultTable::new(vaults);
                    let ids = self.scope.replay(self.vaults.ids());
                    let step = ListSecrets::new(Arc::clone(&self.directory), self.vaults.clone());
                    State::SelectingSecrets(pipeline::run(&self.scope, ids, step))
                }
                State::SelectingSecrets(stream) => {
                    let secrets = self.select_secrets(stream).await?;
                    State::SelectingOperation(secrets)
                }
                State::SelectingOperation(secrets) => match self.select_operation().await? {
                    Some(operation) => {
                        self.stack.push(operation);
                        State::ApplyingOperation(operation, secrets)
                    }
                    None => State::SelectingOperation(secrets),
                },
                State::ApplyingOperation(operation, secrets) => {
                    info!(%operation, secrets = secrets.len(), "applying operation");
                    State::SelectingSecrets(self.apply(operation, secrets))
                }
            };
        }
    }

    async fn select_vaults(&self) -> Result<Vec<Vault>> {
        let directory = Arc::clone(&self.directory);
        let account = self.account.clone();
        let stream = paginate(&self.scope, move |cursor| {
            let directory = Arc::clone(&directory);
            let account = account.clone();
            async move { directory.vault_page(&account, cursor.as_deref()).await }
        });

        let format = self.options.format.clone();
        let options = PickerOptions {
            prompt: "vault> ".to_string(),
            multi: true,
            delimiter: self.options.format.delimiter.clone(),
            hidden_fields: 1,
            header: Some("TAB: select  ENTER: continue".to_string()),
            ..PickerOptions::default()
        };
        let choice = self
            .selector
            .select(stream, move |v: &Vault| format.vault(v), &options)
            .await?;
        chosen(choice, Stage::Vaults)
    }

    async fn select_secrets(&self, stream: ItemStream<Secret>) -> Result<Vec<Secret>> {
        let format = self.options.format.clone();
        let vaults = self.vaults.clone();
        let options = PickerOptions {
            prompt: "secret> ".to_string(),
            multi: true,
            delimiter: self.options.format.delimiter.clone(),
            hidden_fields: 1,
            header: Some("TAB: select  ENTER: continue".to_string()),
            preview: self.options.preview.clone(),
            ..PickerOptions::default()
        };
        let choice = self
            .selector
            .select(stream, move |s: &Secret| format.secret(s, &vaults), &options)
            .await?;
        chosen(choice, Stage::Secrets)
    }

    /// `None` means nothing matched and the menu should be shown again.
    async fn select_operation(&self) -> Result<Option<Operation>> {
        let menu = self.scope.replay(self.stack.available());
        let format = self.options.format.clone();
        let options = PickerOptions {
            prompt: "operation> ".to_string(),
            multi: false,
            delimiter: self.options.format.delimiter.clone(),
            ..PickerOptions::default()
        };

        let choice = self
            .selector
            .select(menu, move |op: &Operation| format.operation(op), &options)
            .await?;
        match choice {
            Choice::Picked(Selection { items, unmatched }) => {
                if let Some(name) = unmatched.into_iter().next() {
                    return Err(Error::UnknownOperation(name));
                }
                match items.into_iter().next() {
                    Some(operation) => Ok(Some(operation)),
                    None => self.empty_operation(),
                }
            }
            Choice::Empty => self.empty_operation(),
            Choice::Cancelled => Err(Error::Cancelled {
                stage: Stage::Operation,
            }),
        }
    }

    fn empty_operation(&self) -> Result<Option<Operation>> {
        match self.options.on_empty_operation {
            EmptyOperationPolicy::Exit => Err(Error::NoSelection {
                stage: Stage::Operation,
            }),
            EmptyOperationPolicy::Reprompt => {
                debug!("no operation selected, showing menu again");
                Ok(None)
            }
        }
    }

    /// Start the stage for `operation`; its output drives the next prompt.
    fn apply(&self, operation: Operation, secrets: Vec<Secret>) -> ItemStream<Secret> {
        let input = self.scope.replay(secrets.clone());
        let directory = &self.directory;
        match operation {
            Operation::ListVersions => pipeline::run(
                &self.scope,
                input,
                ListVersions::new(Arc::clone(directory), self.vaults.clone()),
            ),
            Operation::GetPasswords => pipeline::run(
                &self.scope,
                input,
                FetchValues::new(Arc::clone(directory), self.vaults.clone()),
            ),
            Operation::ListVersionAndGetPasswords => {
                let versions = pipeline::run(
                    &self.scope,
                    input,
                    ListVersions::new(Arc::clone(directory), self.vaults.clone()),
                );
                pipeline::run(
                    &self.scope,
                    versions,
                    FetchValues::new(Arc::clone(directory), self.vaults.clone()),
                )
            }
            Operation::EditMetaData | Operation::DeleteSecret => {
                self.reporter.acknowledge(operation, &secrets, &self.vaults);
                input
            }
        }
    }
}

/// Turn a prompt result into a non-empty selection or a clean-exit error.
fn chosen<T: Pickable>(choice: Choice<T>, stage: Stage) -> Result<Vec<T>> {
    match choice {
        Choice::Picked(selection) if !selection.items.is_empty() => Ok(selection.items),
        Choice::Picked(_) | Choice::Empty => Err(Error::NoSelection { stage }),
        Choice::Cancelled => Err(Error::Cancelled { stage }),
    }
}
