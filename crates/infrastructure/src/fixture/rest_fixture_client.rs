//! REST implementation of the fixture client port.

use std::sync::Arc;

use async_trait::async_trait;
use restprobe_application::ports::{FixtureClient, FixtureError, OutboundRequest, RequestExecutor};
use restprobe_domain::{HttpMethod, Link, ResponseCapture};
use tracing::debug;

use super::payload::LinkEnvelope;

/// Manages links through the server's `v1/link` resources.
///
/// Requests go through the same executor, and therefore the same
/// credentials, as the test cases themselves.
pub struct RestFixtureClient<E: RequestExecutor> {
    executor: Arc<E>,
    base_url: String,
}

impl<E: RequestExecutor> RestFixtureClient<E> {
    /// Creates a client for the server at `base_url`.
    pub fn new(executor: Arc<E>, base_url: impl Into<String>) -> Self {
        Self {
            executor,
            base_url: base_url.into(),
        }
    }

    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<ResponseCapture, FixtureError> {
        let request = OutboundRequest::new(
            method,
            OutboundRequest::resolve_url(&self.base_url, path),
            body,
        );
        debug!(method = %method, url = %request.url, "fixture request");
        Ok(self.executor.execute(&request).await?)
    }

    fn expect_success(operation: &str, capture: ResponseCapture) -> Result<(), FixtureError> {
        if is_success(capture.status) {
            Ok(())
        } else {
            Err(FixtureError::UnexpectedStatus {
                operation: operation.to_string(),
                status: capture.status,
                body: capture.effective_text().to_string(),
            })
        }
    }
}

const fn is_success(status: u16) -> bool {
    matches!(status, 200..=299)
}

#[async_trait]
impl<E: RequestExecutor> FixtureClient for RestFixtureClient<E> {
    async fn create_link(&self, connector_name: &str) -> Result<Link, FixtureError> {
        let capture = self
            .send(HttpMethod::Get, &format!("v1/connector/{connector_name}"), None)
            .await?;
        Self::expect_success("create link", capture)?;

        Ok(Link::new(connector_name))
    }

    async fn save_link(&self, link: &Link) -> Result<(), FixtureError> {
        let body = serde_json::to_vec(&LinkEnvelope::from(link))
            .map_err(|e| FixtureError::Serialization(e.to_string()))?;

        let capture = self.send(HttpMethod::Post, "v1/link", Some(body)).await?;
        Self::expect_success("save link", capture)
    }

    async fn delete_link(&self, name: &str) -> Result<(), FixtureError> {
        let capture = self
            .send(HttpMethod::Delete, &format!("v1/link/{name}"), None)
            .await?;
        Self::expect_success("delete link", capture)
    }

    async fn link_exists(&self, name: &str) -> Result<bool, FixtureError> {
        let capture = self
            .send(HttpMethod::Get, &format!("v1/link/{name}"), None)
            .await?;
        Ok(is_success(capture.status))
    }
}
