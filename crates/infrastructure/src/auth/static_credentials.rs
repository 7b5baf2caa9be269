//! Fixed credentials resolved once at startup.

use async_trait::async_trait;
use restprobe_application::{CredentialError, CredentialSource};
use restprobe_domain::Credentials;

/// Credential source returning the same credentials for every request.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    /// Creates a source for `credentials`.
    #[must_use]
    pub const fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl CredentialSource for StaticCredentials {
    async fn credentials(&self) -> Result<Credentials, CredentialError> {
        Ok(self.credentials.clone())
    }
}
