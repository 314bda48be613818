use thiserror::Error;

/// Boundary validation failures for user-supplied values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("unknown mood tag '{0}'")]
    UnknownMood(String),

    #[error("intensity {0} is outside 1..=10")]
    IntensityOutOfRange(i64),

    #[error("unknown response style '{0}'")]
    UnknownStyle(String),

    #[error("unknown consent answer '{0}'")]
    UnknownConsent(String),

    #[error("unknown condition '{0}'")]
    UnknownCondition(String),

    #[error("unknown timeframe '{0}'")]
    UnknownTimeframe(String),
}
