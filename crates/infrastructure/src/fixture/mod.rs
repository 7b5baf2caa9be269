//! Fixture client over the server's link REST API.

mod payload;
mod rest_fixture_client;

pub use rest_fixture_client::RestFixtureClient;
