//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the harness core and the server
//! it talks to. Each port is a trait implemented by an adapter in the
//! infrastructure layer.

mod credentials;
mod fixture_client;
mod request_executor;

pub use credentials::{CredentialError, CredentialSource};
pub use fixture_client::{FixtureClient, FixtureError};
pub use request_executor::{ExecutorError, OutboundRequest, RequestExecutor};
