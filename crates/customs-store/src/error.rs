//! Error types for customs-store.

use thiserror::Error;

/// Errors from the persistent store and roster preparation.
///
/// Everything here is fatal at startup except when wrapped by the
/// optimizer, which never continues past a store failure either.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store schema error: missing table {0:?}")]
    MissingTable(&'static str),

    #[error("roster inconsistency: {0}")]
    RosterInconsistency(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;
