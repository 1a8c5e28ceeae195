//! Base error type.
//!
//! Sub-crates define their own error enums and either convert `CoreError`
//! into them via `#[from]` or keep it as a wrapped variant.  Both patterns
//! are acceptable; prefer whichever keeps error sites clean.

use thiserror::Error;

/// The top-level error type for `customs-core` and a common base for
/// sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("malformed wall-clock time {0:?}: expected HH:MM:SS")]
    Time(String),

    #[error("unknown lane {0:?}: expected \"domestic\" or \"foreign\"")]
    UnknownLane(String),
}

/// Shorthand result type for all `customs-*` crates.
pub type CoreResult<T> = Result<T, CoreError>;
