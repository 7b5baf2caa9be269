//! Domain error types

use thiserror::Error;

use crate::request::HttpMethod;

/// Domain-level errors raised while building cases, units or fixtures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A body was supplied for a method that cannot carry one.
    #[error("{method} requests cannot carry a body")]
    BodyNotAllowed {
        /// The offending method.
        method: HttpMethod,
    },

    /// A test case was declared without a name.
    #[error("test case for '{0}' has an empty name")]
    EmptyCaseName(String),

    /// Two expanded units resolved to the same identifier.
    #[error("duplicate test unit identifier: {0}")]
    DuplicateUnit(String),

    /// An identifier is invalid or empty.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
