//! Domain-level errors.
//!
//! These errors represent business rule violations. They are independent of
//! infrastructure concerns (HTTP, storage backends).

use thiserror::Error;

use crate::constants::MISSING_FIELDS_PREFIX;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One or more required form fields were empty or absent
    #[error("{}: {}", MISSING_FIELDS_PREFIX, .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
