//! Harness configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use restprobe_domain::Credentials;
use thiserror::Error;
use url::Url;

/// Variable holding the server base URL.
pub const BASE_URL_VAR: &str = "RESTPROBE_BASE_URL";
/// Variable holding the pseudo-authentication user.
pub const USER_VAR: &str = "RESTPROBE_USER";
/// Variable holding a password; switches the user to basic authentication.
pub const PASSWORD_VAR: &str = "RESTPROBE_PASSWORD";
/// Variable holding a bearer token; takes precedence over everything else.
pub const BEARER_TOKEN_VAR: &str = "RESTPROBE_BEARER_TOKEN";
/// Variable naming a file the bearer token is read from on every request.
pub const BEARER_TOKEN_FILE_VAR: &str = "RESTPROBE_BEARER_TOKEN_FILE";
/// Variable holding the request timeout in milliseconds.
pub const TIMEOUT_VAR: &str = "RESTPROBE_TIMEOUT_MS";
/// Variable holding the suite name used in unit identifiers.
pub const SUITE_VAR: &str = "RESTPROBE_SUITE";

/// Default server base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:12000/sqoop/";
/// Default suite name.
pub const DEFAULT_SUITE: &str = "restprobe::registry";
/// User when neither `RESTPROBE_USER` nor `USER` is set.
pub const DEFAULT_USER: &str = "restprobe";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The base URL is not an absolute http(s) URL.
    #[error("{var} is not a valid http(s) URL: {value}")]
    InvalidBaseUrl {
        /// Variable the value came from.
        var: &'static str,
        /// Offending value.
        value: String,
    },

    /// The timeout is not a positive number of milliseconds.
    #[error("{var} must be a positive number of milliseconds, got {value:?}")]
    InvalidTimeout {
        /// Variable the value came from.
        var: &'static str,
        /// Offending value.
        value: String,
    },

    /// A variable is set but blank.
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Settings for one harness run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Server base URL, always ending in `/`.
    pub base_url: String,
    /// User for pseudo or basic authentication.
    pub user: String,
    /// Password; when present the user authenticates with basic auth.
    pub password: Option<String>,
    /// Bearer token, used instead of the user when present.
    pub bearer_token: Option<String>,
    /// File holding a bearer token, used when no token is given inline.
    pub bearer_token_file: Option<PathBuf>,
    /// Per-request timeout; `None` keeps the client default.
    pub timeout: Option<Duration>,
    /// Suite name used in unit identifiers.
    pub suite_name: String,
}

impl HarnessConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = parse_base_url(&base_url)?;

        let user = match lookup(USER_VAR) {
            Some(user) if user.trim().is_empty() => return Err(ConfigError::Empty(USER_VAR)),
            Some(user) => user,
            None => lookup("USER")
                .filter(|user| !user.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_USER.to_string()),
        };

        let password = lookup(PASSWORD_VAR).filter(|password| !password.is_empty());
        let bearer_token = lookup(BEARER_TOKEN_VAR).filter(|token| !token.trim().is_empty());
        let bearer_token_file = match lookup(BEARER_TOKEN_FILE_VAR) {
            Some(path) if path.trim().is_empty() => {
                return Err(ConfigError::Empty(BEARER_TOKEN_FILE_VAR));
            }
            Some(path) => Some(PathBuf::from(path)),
            None => None,
        };

        let timeout = lookup(TIMEOUT_VAR).map(|value| parse_timeout(&value)).transpose()?;

        let suite_name = match lookup(SUITE_VAR) {
            Some(suite) if suite.trim().is_empty() => return Err(ConfigError::Empty(SUITE_VAR)),
            Some(suite) => suite,
            None => DEFAULT_SUITE.to_string(),
        };

        Ok(Self {
            base_url,
            user,
            password,
            bearer_token,
            bearer_token_file,
            timeout,
            suite_name,
        })
    }

    /// Fixed credentials for this configuration.
    ///
    /// An inline bearer token wins over a password, which wins over
    /// pseudo authentication. A token file is not read here.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        match (&self.bearer_token, &self.password) {
            (Some(token), _) => Credentials::bearer(token),
            (None, Some(password)) => Credentials::basic(&self.user, password),
            (None, None) => Credentials::pseudo_user(&self.user),
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user: DEFAULT_USER.to_string(),
            password: None,
            bearer_token: None,
            bearer_token_file: None,
            timeout: None,
            suite_name: DEFAULT_SUITE.to_string(),
        }
    }
}

fn parse_base_url(value: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidBaseUrl {
        var: BASE_URL_VAR,
        value: value.to_string(),
    };

    let url = Url::parse(value.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }

    let mut base = url.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(base)
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
        _ => Err(ConfigError::InvalidTimeout {
            var: TIMEOUT_VAR,
            value: value.to_string(),
        }),
    }
}
