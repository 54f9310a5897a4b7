//! Error types for election simulation.

use thiserror::Error;

/// Result type for allocation and simulation operations
pub type Result<T> = std::result::Result<T, ElectionError>;

/// Errors that can occur while allocating vote shares or running simulations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElectionError {
    /// A share was consumed that the budget could not cover.
    /// Never surfaces while the escalation ladder is working.
    #[error("invalid allocation: {requested} requested with {remaining} remaining")]
    InvalidAllocation { requested: f64, remaining: f64 },

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
}

impl ElectionError {
    pub(crate) fn invalid_parameters(reason: impl Into<String>) -> Self {
        ElectionError::InvalidParameters(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ElectionError::InvalidAllocation {
            requested: 12.5,
            remaining: 3.25,
        };
        assert_eq!(
            err.to_string(),
            "invalid allocation: 12.5 requested with 3.25 remaining"
        );

        let err = ElectionError::invalid_parameters("n_parties must be at least 2");
        assert_eq!(
            err.to_string(),
            "invalid parameters: n_parties must be at least 2"
        );
    }
}
