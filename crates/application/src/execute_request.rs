//! Execute Request Use Case
//!
//! Checks a resolved request and hands it to the executor port.

use std::sync::Arc;

use restprobe_domain::ResponseCapture;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::ports::{ExecutorError, OutboundRequest, RequestExecutor};

/// Result type for request execution.
pub type ExecuteResult = Result<ResponseCapture, ExecuteRequestError>;

/// Error type for the execute request use case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecuteRequestError {
    /// URL is empty.
    #[error("URL is required")]
    EmptyUrl,

    /// URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The executor failed to complete the request.
    #[error("{0}")]
    Executor(#[from] ExecutorError),
}

/// Use case for executing requests.
///
/// # Example
///
/// ```ignore
/// let executor = ReqwestRequestExecutor::new(credentials, None)?;
/// let use_case = ExecuteRequest::new(Arc::new(executor));
///
/// let url = "http://localhost:12000/sqoop/version";
/// let request = OutboundRequest::new(HttpMethod::Get, url, None);
/// let capture = use_case.execute(&request).await?;
/// ```
pub struct ExecuteRequest<E: RequestExecutor> {
    executor: Arc<E>,
}

impl<E: RequestExecutor> ExecuteRequest<E> {
    /// Creates a new `ExecuteRequest` use case with the given executor.
    pub const fn new(executor: Arc<E>) -> Self {
        Self { executor }
    }

    /// Executes the request and returns the captured response.
    ///
    /// # Validation
    ///
    /// - URL must not be empty
    /// - URL must parse and use http:// or https://
    ///
    /// # Errors
    ///
    /// Returns `ExecuteRequestError` on validation or executor failures.
    pub async fn execute(&self, request: &OutboundRequest) -> ExecuteResult {
        Self::validate(request)?;

        debug!(method = %request.method, url = %request.url, "sending request");
        let capture = self.executor.execute(request).await?;

        Ok(capture)
    }

    fn validate(request: &OutboundRequest) -> Result<(), ExecuteRequestError> {
        if request.url.trim().is_empty() {
            return Err(ExecuteRequestError::EmptyUrl);
        }

        let url = Url::parse(&request.url)
            .map_err(|e| ExecuteRequestError::InvalidUrl(format!("{e}: {}", request.url)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ExecuteRequestError::InvalidUrl(
                "URL must start with http:// or https://".to_string(),
            ));
        }

        Ok(())
    }
}
