//! Restprobe - contract tests for a server's REST API
//!
//! Wires the registry of REST calls, the environment configuration and
//! the infrastructure adapters into a runnable harness.

pub mod config;
pub mod harness;
pub mod registry;

pub use config::{ConfigError, HarnessConfig};
pub use harness::{HarnessError, exit_code, run};
