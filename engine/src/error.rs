//! Error types for the ptsync engine.

use crate::{FormatVersion, MutationId};
use thiserror::Error;

/// All possible errors from the ptsync engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Payload errors
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("unsupported mutation type: {0}")]
    UnsupportedMutation(String),

    #[error("invalid value for '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("invalid series spec: {0}")]
    InvalidSeriesSpec(String),

    // Plan errors
    #[error("duplicate order {order} in {parent}")]
    DuplicateOrder { parent: String, order: i32 },

    // Queue errors
    #[error("mutation not found: {0}")]
    MutationNotFound(MutationId),

    // State errors
    #[error("invalid local state: {0}")]
    InvalidState(String),

    #[error("unsupported local state format: {found} (max supported: {supported})")]
    UnsupportedFormat {
        found: FormatVersion,
        supported: FormatVersion,
    },
}

impl Error {
    pub(crate) fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::UnsupportedMutation("PLAN_UPDATE".into());
        assert_eq!(err.to_string(), "unsupported mutation type: PLAN_UPDATE");

        let err = Error::DuplicateOrder {
            parent: "plan".into(),
            order: 2,
        };
        assert_eq!(err.to_string(), "duplicate order 2 in plan");

        let err = Error::field("exercises[0].sets[1].rpe", "must be between 0 and 10");
        assert_eq!(
            err.to_string(),
            "invalid value for 'exercises[0].sets[1].rpe': must be between 0 and 10"
        );

        let err = Error::UnsupportedFormat {
            found: 9,
            supported: 2,
        };
        assert_eq!(
            err.to_string(),
            "unsupported local state format: 9 (max supported: 2)"
        );
    }
}
