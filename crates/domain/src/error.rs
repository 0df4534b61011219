//! Domain errors.
//!
//! Raised while building save-state data from host input: out-of-range spell
//! levels, malformed progression tables and similar.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Data breaks a domain invariant
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    /// Creates a validation error for data that breaks a domain invariant.
    ///
    /// # Example
    /// ```ignore
    /// if level > MAX_SPELL_LEVEL {
    ///     return Err(DomainError::validation("spell level must be 0..=9"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
