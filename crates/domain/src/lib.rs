//! Restprobe Domain - Core harness types
//!
//! This crate defines the domain model for the restprobe harness:
//! declarative test cases, captured responses, the assertion
//! primitives validators are built from, and the fixture link.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod id;
pub mod link;
pub mod request;
pub mod response;
pub mod testing;

pub use auth::Credentials;
pub use error::{DomainError, DomainResult};
pub use id::generate_id_v7;
pub use link::{Link, LinkFixture};
pub use request::HttpMethod;
pub use response::ResponseCapture;
pub use testing::{
    AssertionError, ErrorSignature, ExpandedTestUnit, RunReport, TestCase, UnitOutcome,
    UnitReport, ValidationResult, Validator, expand,
};
