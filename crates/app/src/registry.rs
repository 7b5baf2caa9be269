//! The registry of REST calls exercised against the server.
//!
//! Cases are evaluated in declaration order. Several of them expect the
//! `first-link` fixture to exist while they run.

use restprobe_domain::{DomainResult, TestCase, Validator};

/// Error class every server-side failure is reported with.
pub const SERVER_ERROR_CLASS: &str = "org.apache.sqoop.server.common.ServerError";

/// Expects a 500 carrying `code`.
fn server_error(code: &'static str) -> Validator {
    Validator::new(move |response| {
        response.assert_status(500)?;
        response.assert_server_error(SERVER_ERROR_CLASS, code)
    })
}

/// Expects a 500 carrying `code` and a message containing `message`.
fn server_error_with(code: &'static str, message: &'static str) -> Validator {
    Validator::new(move |response| {
        response.assert_status(500)?;
        response.assert_server_error(SERVER_ERROR_CLASS, code)?;
        response.assert_contains(message)
    })
}

/// Expects a 200 whose body mentions `needle`.
fn ok_containing(needle: &'static str) -> Validator {
    Validator::new(move |response| {
        response.assert_status(200)?;
        response.assert_contains(needle)
    })
}

/// Returns the REST calls to run, in order.
///
/// # Errors
///
/// Returns an error if a case is malformed.
pub fn rest_calls() -> DomainResult<Vec<TestCase>> {
    Ok(vec![
        // Basic
        TestCase::get("Valid", "version", Validator::status(200))?,
        TestCase::post(
            "Invalid post request",
            "version",
            "Random text",
            server_error("SERVER_0002"),
        )?,
        // Connector
        TestCase::get("Get all connectors", "v1/connector/all", Validator::status(200))?,
        TestCase::get("Get connector by ID", "v1/connector/1", Validator::status(200))?,
        TestCase::get(
            "Get connector by name",
            "v1/connector/generic-jdbc-connector",
            Validator::status(200),
        )?,
        TestCase::get(
            "Get connector by non-existing ID",
            "v1/connector/666",
            server_error("SERVER_0006"),
        )?,
        TestCase::get(
            "Get connector by non-existing name",
            "v1/connector/jarcecs-cool-connector",
            server_error("SERVER_0005"),
        )?,
        TestCase::post(
            "Invalid post request",
            "v1/connector",
            "Random data",
            server_error("SERVER_0002"),
        )?,
        // Link
        TestCase::get("Get all links", "v1/link/all", ok_containing("first-link"))?,
        TestCase::get("Get link by name", "v1/link/first-link", ok_containing("first-link"))?,
        TestCase::get(
            "Get all links for connector",
            "v1/link/all?cname=generic-jdbc-connector",
            ok_containing("first-link"),
        )?,
        TestCase::get(
            "Get non existing link",
            "v1/link/i-dont-exists",
            server_error_with("SERVER_0006", "Invalid link name: i-dont-exists"),
        )?,
        TestCase::get(
            "Get links for non existing connector",
            "v1/link/all?cname=i-dont-exists",
            server_error_with("SERVER_0005", "Invalid connector: i-dont-exists"),
        )?,
    ])
}
