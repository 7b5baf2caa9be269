//! Restprobe Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (request executor, credential source, fixture client)
//! - Request execution and suite running use cases
//! - Application-level error handling

pub mod error;
pub mod execute_request;
pub mod ports;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
pub use execute_request::{ExecuteRequest, ExecuteRequestError, ExecuteResult};
pub use ports::{
    CredentialError, CredentialSource, ExecutorError, FixtureClient, FixtureError,
    OutboundRequest, RequestExecutor,
};
pub use use_cases::SuiteRunner;
