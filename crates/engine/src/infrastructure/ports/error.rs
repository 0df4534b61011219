//! Error types for port operations.

/// Failure reported by a host collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// The host refused the operation - includes operation name for tracing.
    #[error("Host rejected {operation}: {message}")]
    Rejected {
        operation: &'static str,
        message: String,
    },

    /// The host subsystem is not available (e.g. no save loaded).
    #[error("Host unavailable for {0}")]
    Unavailable(&'static str),
}

impl PortError {
    /// Create a Rejected error with operation context.
    pub fn rejected(operation: &'static str, message: impl ToString) -> Self {
        Self::Rejected {
            operation,
            message: message.to_string(),
        }
    }

    /// Create an Unavailable error.
    pub fn unavailable(operation: &'static str) -> Self {
        Self::Unavailable(operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_carries_operation() {
        let err = PortError::rejected("learn_spells_on_raise", "spellbook is locked");
        assert_eq!(
            err.to_string(),
            "Host rejected learn_spells_on_raise: spellbook is locked"
        );
    }

    #[test]
    fn unavailable_message() {
        let err = PortError::unavailable("retire_spellbook");
        assert_eq!(err.to_string(), "Host unavailable for retire_spellbook");
    }
}
