//! Error types for the bacefook-core crate.
//!
//! The simulation has a single failure mode: a malformed user count. Retry
//! exhaustion while searching for friends is expected behavior and is never
//! reported as an error.

use core::convert::Infallible;

/// Errors that can occur when generating a batch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    /// The requested user count is not a finite positive integer.
    #[error("please supply a positive integer for the user count (got {value})")]
    InvalidArgument {
        /// The rejected input, rendered for diagnostics.
        value: String,
    },
}

impl SimulationError {
    /// Build an [`SimulationError::InvalidArgument`] from any displayable input.
    pub fn invalid_argument(value: impl core::fmt::Display) -> Self {
        Self::InvalidArgument {
            value: value.to_string(),
        }
    }
}

impl From<Infallible> for SimulationError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_asks_for_positive_integer() {
        let err = SimulationError::invalid_argument(-5);
        let message = err.to_string();
        assert!(message.contains("positive integer"));
        assert!(message.contains("-5"));
    }
}
