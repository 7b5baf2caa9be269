//! Fixture link types.
//!
//! A link is a named connector configuration persisted on the server
//! under test. Several cases expect one to exist, so the runner creates
//! it before every unit and deletes it afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Input key for the JDBC driver class.
pub const JDBC_DRIVER: &str = "linkConfig.jdbcDriver";
/// Input key for the JDBC connection string.
pub const CONNECTION_STRING: &str = "linkConfig.connectionString";
/// Input key for the database user.
pub const USERNAME: &str = "linkConfig.username";
/// Input key for the database password.
pub const PASSWORD: &str = "linkConfig.password";

/// A connector configuration resource on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Link name, unique on the server
    pub name: String,
    /// Connector the link configures
    pub connector_name: String,
    /// Connector link-config inputs by key
    pub inputs: BTreeMap<String, String>,
}

impl Link {
    /// Creates an unnamed link for `connector_name`.
    pub fn new(connector_name: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            connector_name: connector_name.into(),
            inputs: BTreeMap::new(),
        }
    }

    /// Sets the link name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Sets a link-config input.
    pub fn set_input(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inputs.insert(key.into(), value.into());
    }

    /// Returns a link-config input.
    #[must_use]
    pub fn input(&self, key: &str) -> Option<&str> {
        self.inputs.get(key).map(String::as_str)
    }

    /// Sets the JDBC driver class.
    pub fn set_driver_class(&mut self, value: impl Into<String>) {
        self.set_input(JDBC_DRIVER, value);
    }

    /// Sets the JDBC connection string.
    pub fn set_connection_string(&mut self, value: impl Into<String>) {
        self.set_input(CONNECTION_STRING, value);
    }

    /// Sets the database user.
    pub fn set_username(&mut self, value: impl Into<String>) {
        self.set_input(USERNAME, value);
    }

    /// Sets the database password.
    pub fn set_password(&mut self, value: impl Into<String>) {
        self.set_input(PASSWORD, value);
    }
}

/// Description of the link created around every unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkFixture {
    /// Name the link is saved under
    pub name: String,
    /// Connector to create the link for
    pub connector_name: String,
    /// JDBC driver class
    pub driver_class: String,
    /// JDBC connection string
    pub connection_string: String,
    /// Database user
    pub username: String,
    /// Database password
    pub password: String,
}

impl LinkFixture {
    /// Fills a freshly created link with this fixture's name and inputs.
    pub fn apply_to(&self, link: &mut Link) {
        link.set_name(&self.name);
        link.set_driver_class(&self.driver_class);
        link.set_connection_string(&self.connection_string);
        link.set_username(&self.username);
        link.set_password(&self.password);
    }
}

impl Default for LinkFixture {
    fn default() -> Self {
        Self {
            name: "first-link".to_string(),
            connector_name: "generic-jdbc-connector".to_string(),
            driver_class: "org.apache.derby.jdbc.ClientDriver".to_string(),
            connection_string: "jdbc:derby:memory:invalid-rest-calls-test;create=true".to_string(),
            username: "sqoop".to_string(),
            password: "is-awesome".to_string(),
        }
    }
}
