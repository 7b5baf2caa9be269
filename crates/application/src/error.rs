//! Application error types

use restprobe_domain::DomainError;
use thiserror::Error;

use crate::ports::FixtureError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The fixture could not be managed.
    #[error("fixture error: {0}")]
    Fixture(#[from] FixtureError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
