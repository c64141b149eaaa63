//! Error taxonomy for storage and session management.

use thiserror::Error;

/// Failure talking to one of the two datastores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Datastore could not be opened, or its connection lock was poisoned
    #[error("datastore unavailable")]
    Unavailable,
    /// A single statement failed
    #[error("query failed: {0}")]
    Query(#[from] rusqlite::Error),
    /// Provisioning could not copy or create files
    #[error("provisioning failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure creating, renaming or removing a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session name cannot be empty")]
    EmptyName,
    #[error("a session named '{0}' already exists")]
    DuplicateName(String),
    #[error("session {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Rejected before touching storage because the input broke a naming rule
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::EmptyName | Self::DuplicateName(_))
    }
}

impl From<rusqlite::Error> for SessionError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Store(StoreError::Query(e))
    }
}
