//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid topic category: {0}")]
    InvalidCategory(String),

    #[error("Invalid problem: {0}")]
    InvalidProblem(String),
}

impl DomainError {
    /// Check if this error was raised by the content state machine
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, DomainError::InvalidTransition { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_error_display() {
        let error = DomainError::InvalidTransition {
            from: "completed".to_string(),
            to: "generating".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid status transition: completed -> generating"
        );
    }

    #[test]
    fn test_is_invalid_transition_check() {
        assert!(
            DomainError::InvalidTransition {
                from: "failed".to_string(),
                to: "pending".to_string()
            }
            .is_invalid_transition()
        );
        assert!(!DomainError::InvalidTopic("".to_string()).is_invalid_transition());
    }
}
