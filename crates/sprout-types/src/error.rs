//! Error types for threshold draft validation.

use thiserror::Error;

use crate::types::Metric;

/// Rejection of a threshold draft at save time.
///
/// Each variant names the offending metric group so the settings UI can
/// point at the right row. Stored data is never validated on read;
/// these errors exist only on the write path.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum DraftError {
    /// A bound is missing or was not a number.
    #[error("{metric} thresholds are incomplete: {detail}")]
    Incomplete {
        /// The offending metric group.
        metric: Metric,
        /// Which bound was missing or non-numeric.
        detail: &'static str,
    },

    /// The minimum exceeds the maximum.
    #[error("{metric} thresholds are inverted: min {min} is greater than max {max}")]
    Inverted {
        /// The offending metric group.
        metric: Metric,
        min: f64,
        max: f64,
    },
}

impl DraftError {
    /// The metric group the draft was rejected for.
    pub fn metric(&self) -> Metric {
        match self {
            DraftError::Incomplete { metric, .. } => *metric,
            DraftError::Inverted { metric, .. } => *metric,
        }
    }
}

/// Result type alias for draft validation.
pub type DraftResult<T> = std::result::Result<T, DraftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_message_names_group() {
        let err = DraftError::Inverted {
            metric: Metric::Temperature,
            min: 70.0,
            max: 50.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("temperature"));
        assert!(msg.contains("70"));
        assert!(msg.contains("50"));
    }

    #[test]
    fn test_incomplete_message_names_group() {
        let err = DraftError::Incomplete {
            metric: Metric::Ammonia,
            detail: "min is missing or not a number",
        };
        assert!(err.to_string().contains("ammonia"));
        assert_eq!(err.metric(), Metric::Ammonia);
    }
}
