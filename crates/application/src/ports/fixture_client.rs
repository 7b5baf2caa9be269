//! Fixture client port
//!
//! Defines the interface for managing links on the server under test.

use async_trait::async_trait;
use restprobe_domain::Link;

use super::ExecutorError;

/// Errors that can occur while managing fixture links.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FixtureError {
    /// The underlying request failed.
    #[error(transparent)]
    Request(#[from] ExecutorError),

    /// The server answered with an unexpected status.
    #[error("{operation} returned status {status}: {body}")]
    UnexpectedStatus {
        /// Operation that was attempted.
        operation: String,
        /// Status the server returned.
        status: u16,
        /// Response text, for diagnostics.
        body: String,
    },

    /// A link payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Client for the link resources several test cases depend on.
#[async_trait]
pub trait FixtureClient: Send + Sync {
    /// Creates an unsaved link for `connector_name`.
    ///
    /// # Errors
    /// Returns an error if the connector is unknown or unreachable.
    async fn create_link(&self, connector_name: &str) -> Result<Link, FixtureError>;

    /// Persists `link` on the server.
    ///
    /// # Errors
    /// Returns an error if the server rejects the link.
    async fn save_link(&self, link: &Link) -> Result<(), FixtureError>;

    /// Deletes the link called `name`.
    ///
    /// # Errors
    /// Returns an error if the server rejects the deletion.
    async fn delete_link(&self, name: &str) -> Result<(), FixtureError>;

    /// Checks whether a link called `name` exists.
    ///
    /// # Errors
    /// Returns an error if the server cannot be queried.
    async fn link_exists(&self, name: &str) -> Result<bool, FixtureError>;
}
