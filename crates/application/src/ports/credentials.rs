//! Credential source port

use async_trait::async_trait;
use restprobe_domain::Credentials;

/// Errors raised while obtaining credentials.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// No credentials are available.
    #[error("no credentials available: {0}")]
    Unavailable(String),
}

/// Supplies the credentials every connection is opened with.
///
/// Token negotiation, caching and renewal live behind this trait; the
/// executor only applies what it returns.
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Returns the credentials for the next connection.
    ///
    /// # Errors
    /// Returns an error if credentials cannot be obtained.
    async fn credentials(&self) -> Result<Credentials, CredentialError>;
}
