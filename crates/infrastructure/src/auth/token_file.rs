//! Bearer token read from a file on every request.

use std::path::PathBuf;

use async_trait::async_trait;
use restprobe_application::{CredentialError, CredentialSource};
use restprobe_domain::Credentials;
use tokio::fs;

/// Credential source reading a bearer token from a file.
///
/// The file is read for each request, so a token renewed on disk by an
/// external process is picked up without restarting the run.
#[derive(Debug, Clone)]
pub struct TokenFileCredentials {
    path: PathBuf,
}

impl TokenFileCredentials {
    /// Creates a source reading the token at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CredentialSource for TokenFileCredentials {
    async fn credentials(&self) -> Result<Credentials, CredentialError> {
        let contents = fs::read_to_string(&self.path).await.map_err(|e| {
            CredentialError::Unavailable(format!("{}: {e}", self.path.display()))
        })?;

        let token = contents.trim();
        if token.is_empty() {
            return Err(CredentialError::Unavailable(format!(
                "{}: token file is empty",
                self.path.display()
            )));
        }

        Ok(Credentials::bearer(token))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_reads_trimmed_token() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("token");
        std::fs::write(&path, "delegation-token\n").unwrap();

        let source = TokenFileCredentials::new(&path);

        assert_eq!(
            source.credentials().await.unwrap(),
            Credentials::bearer("delegation-token")
        );
    }

    #[tokio::test]
    async fn test_picks_up_renewed_token() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("token");
        std::fs::write(&path, "first").unwrap();
        let source = TokenFileCredentials::new(&path);
        assert_eq!(source.credentials().await.unwrap(), Credentials::bearer("first"));

        std::fs::write(&path, "second").unwrap();
        assert_eq!(source.credentials().await.unwrap(), Credentials::bearer("second"));
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let dir = tempdir().expect("Failed to create temp directory");
        let source = TokenFileCredentials::new(dir.path().join("absent"));

        let result = source.credentials().await;

        assert!(matches!(result, Err(CredentialError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_empty_file_is_unavailable() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("token");
        std::fs::write(&path, "  \n").unwrap();

        let result = TokenFileCredentials::new(&path).credentials().await;

        assert_eq!(
            result,
            Err(CredentialError::Unavailable(format!(
                "{}: token file is empty",
                path.display()
            )))
        );
    }
}
