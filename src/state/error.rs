//! Errors surfaced by the shared application state

use crate::settings::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// A duration edit was rejected; nothing changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A thread panicked while holding one of the state locks.
    #[error("failed to lock {0}")]
    LockPoisoned(&'static str),
}
