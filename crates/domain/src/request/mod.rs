//! HTTP request domain types

mod method;

pub use method::HttpMethod;
