//! Error types for duration edits and settings persistence

/// Rejected duration edit. Engine state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Zero or negative minutes.
    #[error("duration must be a positive number of minutes, got {0}")]
    NonPositive(i64),

    /// A number with a fractional part.
    #[error("duration must be a whole number of minutes, got {0}")]
    NotAnInteger(String),

    /// Anything that is not a number at all.
    #[error("duration could not be parsed: {0:?}")]
    Unparsable(String),

    /// Positive but does not fit the minutes range.
    #[error("duration of {0} minutes is too large")]
    TooLarge(i64),
}

/// Failure reading or writing the settings record.
///
/// Never surfaced to the timer: reads fall back to defaults and writes are
/// logged by the engine.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Underlying filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store or the record inside it is not valid JSON of the right shape.
    #[error("malformed settings record: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The record parsed but holds durations that are not positive.
    #[error("stored settings are invalid: {0}")]
    Invalid(#[from] ValidationError),

    /// An in-memory store lock was poisoned.
    #[error("settings store lock poisoned")]
    Poisoned,
}
