//! Error taxonomy for the reading pipeline.
//!
//! Missing measurements are not errors (they classify as `Unclassified`) and
//! neither are out-of-range values (they classify as `Dangerous`). Only a
//! reading whose timeline position cannot be established fails.

use thiserror::Error;

/// Errors raised while turning raw readings into normalized ones.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadingError {
    // ---
    /// The `date` or `time` field could not be parsed.
    #[error("malformed timestamp: date={date:?} time={time:?}")]
    MalformedTimestamp { date: String, time: String },

    #[error("unknown parameter: {0}")]
    UnknownParameter(String),
}
