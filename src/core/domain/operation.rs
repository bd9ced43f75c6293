//! Operation registry.
//!
//! The fixed set of operations applicable to selected secrets, plus the
//! append-only stack of operations already applied in a session. The menu
//! offered next is a pure function of that stack.

use std::fmt;

/// An operation on selected secrets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListVersions,
    GetPasswords,
    ListVersionAndGetPasswords,
    EditMetaData,
    DeleteSecret,
}

/// Stable name and description of an operation.
#[derive(Debug)]
pub struct OperationInfo {
    pub operation: Operation,
    pub name: &'static str,
    pub description: &'static str,
}

/// Every operation, in menu order. Indexed by `Operation as usize`.
pub const OPERATIONS: [OperationInfo; 5] = [
    OperationInfo {
        operation: Operation::ListVersions,
        name: "list-versions",
        description: "List versions for selected items",
    },
    OperationInfo {
        operation: Operation::GetPasswords,
        name: "get-passwords",
        description: "Get passwords for selected items",
    },
    OperationInfo {
        operation: Operation::ListVersionAndGetPasswords,
        name: "list-version-get-password",
        description: "List versions and get passwords for selected items",
    },
    OperationInfo {
        operation: Operation::EditMetaData,
        name: "edit-meta",
        description: "Edit meta data for selected items in $EDITOR",
    },
    OperationInfo {
        operation: Operation::DeleteSecret,
        name: "delete-secret",
        description: "Delete selected secret and all of its versions",
    },
];

impl Operation {
    pub fn info(self) -> &'static OperationInfo {
        &OPERATIONS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn description(self) -> &'static str {
        self.info().description
    }

    /// Look up an operation by its stable name.
    pub fn from_name(name: &str) -> Option<Self> {
        OPERATIONS
            .iter()
            .find(|info| info.name == name)
            .map(|info| info.operation)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Operations applied so far in the current session, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationStack {
    applied: Vec<Operation>,
}

impl OperationStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, operation: Operation) {
        self.applied.push(operation);
    }

    pub fn contains(&self, operation: Operation) -> bool {
        self.applied.contains(&operation)
    }

    pub fn as_slice(&self) -> &[Operation] {
        &self.applied
    }

    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    /// Operations to offer next, in menu order.
    ///
    /// - `list-versions` only while no version listing has been applied
    /// - password fetches only while the combined operation has not run
    /// - `edit-meta` and `delete-secret` always
    pub fn available(&self) -> Vec<Operation> {
        let combined = self.contains(Operation::ListVersionAndGetPasswords);
        let listed = self.contains(Operation::ListVersions) || combined;

        OPERATIONS
            .iter()
            .map(|info| info.operation)
            .filter(|op| match op {
                Operation::ListVersions => !listed,
                Operation::GetPasswords | Operation::ListVersionAndGetPasswords => !combined,
                Operation::EditMetaData | Operation::DeleteSecret => true,
            })
            .collect()
    }
}
