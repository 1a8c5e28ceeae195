//! Engine error type.

use thiserror::Error;

/// Errors surfaced by the tick loop.
///
/// The loop itself performs no in-loop recovery — an inconsistent engine
/// state is a bug, not a runtime failure — so the only runtime error is a
/// failing roster source.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("roster source error: {0}")]
    Roster(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SimError {
    /// Wrap an arbitrary roster-source failure.
    pub fn roster<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SimError::Roster(Box::new(err))
    }
}

/// Shorthand result type for the engine.
pub type SimResult<T> = Result<T, SimError>;
