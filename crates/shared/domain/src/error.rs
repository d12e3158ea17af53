//! Domain-level errors.
//!
//! These errors represent domain values that cannot be built from their input.
//! They are independent of infrastructure concerns (HTTP, identity provider).

use thiserror::Error;

/// Domain-specific errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A provider record could not be projected into a domain value
    #[error("Invalid representation: {0}")]
    InvalidRepresentation(String),
}

impl DomainError {
    /// Create an invalid representation error
    pub fn invalid_representation(msg: impl Into<String>) -> Self {
        DomainError::InvalidRepresentation(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
