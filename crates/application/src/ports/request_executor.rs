//! Request executor port

use async_trait::async_trait;
use restprobe_domain::{HttpMethod, ResponseCapture, TestCase};

use super::CredentialError;

/// Harness-side failures while talking to the server.
///
/// These are infrastructure problems, never assertion failures: a
/// response with an error status is returned as a [`ResponseCapture`],
/// not as one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutorError {
    /// The URL could not be used.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The host name could not be resolved.
    #[error("DNS lookup failed for {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying error message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection failed for another reason.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The request did not complete in time.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The error channel of an error response could not be read.
    #[error("failed to read error response: {0}")]
    ErrorChannelUnreadable(String),

    /// No credentials could be obtained for the connection.
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    /// Any other client failure.
    #[error("{0}")]
    Other(String),
}

/// A fully resolved request, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    /// Method to send the request with.
    pub method: HttpMethod,
    /// Absolute URL.
    pub url: String,
    /// Payload, sent in full with a matching `Content-Length`.
    pub body: Option<Vec<u8>>,
}

impl OutboundRequest {
    /// Creates a request.
    pub fn new(method: HttpMethod, url: impl Into<String>, body: Option<Vec<u8>>) -> Self {
        Self {
            method,
            url: url.into(),
            body,
        }
    }

    /// Builds the request a test case describes, relative to `base_url`.
    #[must_use]
    pub fn for_case(base_url: &str, case: &TestCase) -> Self {
        Self::new(
            case.method(),
            Self::resolve_url(base_url, case.endpoint_path()),
            case.body().map(<[u8]>::to_vec),
        )
    }

    /// Joins a base URL and a relative path with exactly one `/`.
    #[must_use]
    pub fn resolve_url(base_url: &str, path: &str) -> String {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Port for executing requests against the server under test.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Sends `request` over an authenticated connection and captures
    /// both response channels.
    ///
    /// # Errors
    ///
    /// Returns an error on connection-level failures or when the error
    /// channel cannot be read. Error statuses are not errors here.
    async fn execute(&self, request: &OutboundRequest) -> Result<ResponseCapture, ExecutorError>;
}
