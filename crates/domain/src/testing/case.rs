//! Declarative test case model.

use std::fmt;
use std::sync::Arc;

use crate::error::{DomainError, DomainResult};
use crate::request::HttpMethod;
use crate::response::ResponseCapture;

use super::assertion::ValidationResult;

type ValidateFn = dyn Fn(&ResponseCapture) -> ValidationResult + Send + Sync;

/// Validation routine bound to a test case when the case is defined.
///
/// A validator usually chains several assertion primitives with `?`;
/// every one of them must pass for the unit to pass.
///
/// # Example
///
/// ```
/// use restprobe_domain::{ResponseCapture, Validator};
///
/// let validator = Validator::new(|response| {
///     response.assert_status(500)?;
///     response.assert_contains("Invalid link name")
/// });
///
/// let capture = ResponseCapture::from_body(500, "Invalid link name: x");
/// assert!(validator.validate(&capture).is_ok());
/// ```
#[derive(Clone)]
pub struct Validator(Arc<ValidateFn>);

impl Validator {
    /// Wraps a closure as a validator.
    pub fn new<F>(validate: F) -> Self
    where
        F: Fn(&ResponseCapture) -> ValidationResult + Send + Sync + 'static,
    {
        Self(Arc::new(validate))
    }

    /// Validator that only checks the status code.
    #[must_use]
    pub fn status(expected: u16) -> Self {
        Self::new(move |response| response.assert_status(expected))
    }

    /// Runs the validator against a captured response.
    ///
    /// # Errors
    ///
    /// Returns the first assertion that did not hold.
    pub fn validate(&self, response: &ResponseCapture) -> ValidationResult {
        (self.0)(response)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

/// A request description paired with the outcome it must produce.
///
/// Cases are immutable once built. A non-empty body is only accepted
/// for methods that can carry one.
#[derive(Debug, Clone)]
pub struct TestCase {
    name: String,
    endpoint_path: String,
    method: HttpMethod,
    body: Option<Vec<u8>>,
    validator: Validator,
}

impl TestCase {
    /// Creates a new test case.
    ///
    /// An empty body on a method without body support is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyCaseName`] if `name` is blank and
    /// [`DomainError::BodyNotAllowed`] if a non-empty body is given for a
    /// method that cannot carry one.
    pub fn new(
        name: impl Into<String>,
        endpoint_path: impl Into<String>,
        method: HttpMethod,
        body: Option<Vec<u8>>,
        validator: Validator,
    ) -> DomainResult<Self> {
        let name = name.into();
        let endpoint_path = endpoint_path.into();

        if name.trim().is_empty() {
            return Err(DomainError::EmptyCaseName(endpoint_path));
        }

        let body = match body {
            Some(bytes) if !method.has_body() => {
                if !bytes.is_empty() {
                    return Err(DomainError::BodyNotAllowed { method });
                }
                None
            }
            other => other,
        };

        Ok(Self {
            name,
            endpoint_path,
            method,
            body,
            validator,
        })
    }

    /// Creates a GET test case.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyCaseName`] if `name` is blank.
    pub fn get(
        name: impl Into<String>,
        endpoint_path: impl Into<String>,
        validator: Validator,
    ) -> DomainResult<Self> {
        Self::new(name, endpoint_path, HttpMethod::Get, None, validator)
    }

    /// Creates a POST test case sending `body` as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyCaseName`] if `name` is blank.
    pub fn post(
        name: impl Into<String>,
        endpoint_path: impl Into<String>,
        body: &str,
        validator: Validator,
    ) -> DomainResult<Self> {
        Self::new(
            name,
            endpoint_path,
            HttpMethod::Post,
            Some(body.as_bytes().to_vec()),
            validator,
        )
    }

    /// Human-readable label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path relative to the server's base URL.
    #[must_use]
    pub fn endpoint_path(&self) -> &str {
        &self.endpoint_path
    }

    /// Method the request is sent with.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Payload, if the case sends one.
    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// The validator bound to this case.
    #[must_use]
    pub const fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Runs this case's validator against `response`.
    ///
    /// # Errors
    ///
    /// Returns the first assertion that did not hold.
    pub fn validate(&self, response: &ResponseCapture) -> ValidationResult {
        self.validator.validate(response)
    }
}
