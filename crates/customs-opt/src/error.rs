//! Error types for customs-opt.

use thiserror::Error;

use customs_engine::SimError;
use customs_store::StoreError;

/// Errors surfaced by the optimizer.  Both underlying kinds abort the
/// search — the only tolerated anomalies (empty hours, capacity-bound
/// hours) are recorded as outcomes, not errors.
#[derive(Debug, Error)]
pub enum OptError {
    #[error("optimizer configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Sim(#[from] SimError),
}

/// Alias for `Result<T, OptError>`.
pub type OptResult<T> = Result<T, OptError>;
