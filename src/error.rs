//! Error types shared by every mining stage.

use std::borrow::Cow;
use thiserror::Error;

/// Result type alias for mining operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A (basket, item) pair could not be indexed.
    #[error("invalid input at pair {position}: {message}")]
    InvalidInput {
        position: usize,
        message: Cow<'static, str>,
    },

    #[error("invalid value for {name}: {message}")]
    InvalidParameter {
        name: &'static str,
        message: Cow<'static, str>,
    },

    /// A subset of a frequent itemset is missing from the mined records.
    /// This means the miner is broken, not the caller.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),

    #[error("mining deadline of {limit_ms}ms exceeded while counting level {level}")]
    DeadlineExceeded { level: usize, limit_ms: u128 },
}

impl Error {
    pub(crate) fn invalid_parameter(
        name: &'static str,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Error::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_input(position: usize, message: impl Into<Cow<'static, str>>) -> Self {
        Error::InvalidInput {
            position,
            message: message.into(),
        }
    }

    /// Whether the error was caused by the caller's data or parameters.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput { .. } | Error::InvalidParameter { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_parameter() {
        let err = Error::invalid_parameter("min_support", "must be in (0, 1], got 0");
        assert_eq!(
            err.to_string(),
            "invalid value for min_support: must be in (0, 1], got 0"
        );
        assert!(err.is_user_error());
    }

    #[test]
    fn invariant_is_not_a_user_error() {
        let err = Error::InternalInvariant("missing {a}".to_string());
        assert!(!err.is_user_error());
        let err = Error::DeadlineExceeded {
            level: 3,
            limit_ms: 10,
        };
        assert!(!err.is_user_error());
        assert!(err.to_string().contains("level 3"));
    }
}
