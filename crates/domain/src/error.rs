//! Unified error types for the domain layer
//!
//! Every failure here is a caller mistake: the engine maps both variants to
//! the `BadRequest` category.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., empty relation name, inverted time window)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Malformed qualified identifier
    #[error("Invalid ID format: {0}")]
    InvalidId(String),
}

impl DomainError {
    /// Creates a validation error for rule violations on caller input.
    ///
    /// # Example
    /// ```ignore
    /// if normalized.is_empty() {
    ///     return Err(DomainError::validation("relation name cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid ID error
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
