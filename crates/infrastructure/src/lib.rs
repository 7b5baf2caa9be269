//! Restprobe Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod auth;
pub mod fixture;

pub use adapters::ReqwestRequestExecutor;
pub use auth::{StaticCredentials, TokenFileCredentials};
pub use fixture::RestFixtureClient;
