//! Credential types applied to outgoing requests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Query parameter carrying the user for Hadoop simple authentication.
pub const PSEUDO_USER_PARAM: &str = "user.name";

/// Credentials an authenticated connection is opened with.
///
/// How these are obtained is up to the credential source; the harness
/// only applies them to each request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Credentials {
    /// No authentication
    #[default]
    Anonymous,
    /// Simple (pseudo) authentication via the `user.name` query parameter
    PseudoUser {
        /// User the server should attribute the request to
        user: String,
    },
    /// Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },
    /// Bearer token authentication
    Bearer {
        /// The token, without the `Bearer` prefix
        token: String,
    },
}

impl Credentials {
    /// Creates pseudo-user credentials.
    #[must_use]
    pub fn pseudo_user(user: impl Into<String>) -> Self {
        Self::PseudoUser { user: user.into() }
    }

    /// Creates basic credentials.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates bearer credentials.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Query parameter to append to the request URL, if any.
    #[must_use]
    pub fn query_param(&self) -> Option<(&'static str, &str)> {
        match self {
            Self::PseudoUser { user } => Some((PSEUDO_USER_PARAM, user.as_str())),
            _ => None,
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::PseudoUser { user } => f.debug_struct("PseudoUser").field("user", user).finish(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Self::Bearer { .. } => f.debug_struct("Bearer").field("token", &"***").finish(),
        }
    }
}
