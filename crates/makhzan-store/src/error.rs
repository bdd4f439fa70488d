//! Datastore error taxonomy.
//!
//! Backend errors are wrapped with the operation and mapped object name so
//! failures can be diagnosed without backend logs. Only absence-coded backend
//! errors are downgraded to non-exceptional outcomes (`has` returns false,
//! `open` and `delete` tolerate absence); everything else surfaces as one of
//! the variants below, with the original client error preserved as `source`.

use makhzan_client::ClientError;
use thiserror::Error;

use crate::keys::Key;

/// Result type for datastore operations.
pub type Result<T> = std::result::Result<T, DatastoreError>;

/// Errors reported by the datastore and lock.
#[derive(Debug, Error)]
pub enum DatastoreError {
    /// A read or existence probe addressed an absent key.
    #[error("key not found: {key}")]
    NotFound { key: Key },

    /// A put failed, possibly after a best-effort bucket auto-create.
    #[error("write failed for object '{name}'")]
    WriteFailed {
        name: String,
        #[source]
        source: ClientError,
    },

    /// A delete failed for a reason other than absence.
    #[error("delete failed for object '{name}'")]
    DeleteFailed {
        name: String,
        #[source]
        source: ClientError,
    },

    /// The root existence probe failed for a reason other than absence.
    #[error("failed to open datastore at root '{root}'")]
    OpenFailed {
        root: String,
        #[source]
        source: ClientError,
    },

    /// Lock acquisition found an existing sentinel, or the existence check
    /// itself errored.
    #[error("repository is already locked: {name}")]
    AlreadyLocked { name: String },

    /// The backend returned a success response that is structurally unusable.
    #[error("protocol violation: {detail}")]
    ProtocolViolation { detail: String },

    /// Invalid or incomplete datastore configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Any other backend failure, wrapped with operation context.
    #[error("{op} failed for '{name}'")]
    Backend {
        op: &'static str,
        name: String,
        #[source]
        source: ClientError,
    },
}

impl DatastoreError {
    /// True when the error is the non-exceptional not-found outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatastoreError::NotFound { .. })
    }
}
