//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Validation and argument-shape failures are deterministic usage errors; they
/// are never worth retrying. Store failures are carried through as
/// [`DomainError::Store`] with the backend's own message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Field values failed validation, or an operation was attempted on an
    /// entity that is missing required state (e.g. an update without an id).
    #[error("{0}")]
    DataValidation(String),

    /// An argument had the wrong shape for the operation (e.g. a list passed
    /// where a scalar price is expected).
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// The targeted row does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backing store reported a failure (connection loss, constraint
    /// violation, decode failure...).
    #[error("store error: {0}")]
    Store(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::DataValidation(msg.into())
    }

    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Self::TypeMismatch(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::DataValidation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_displayed_verbatim() {
        let err = DomainError::validation("Update called with empty ID field");
        assert_eq!(err.to_string(), "Update called with empty ID field");
        assert!(err.is_validation());
    }

    #[test]
    fn type_mismatch_is_not_a_validation_error() {
        let err = DomainError::type_mismatch("price must be a scalar");
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "type mismatch: price must be a scalar");
    }
}
