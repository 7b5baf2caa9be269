//! Assertion primitives evaluated against a [`ResponseCapture`].
//!
//! Error bodies are matched by substring instead of being parsed, so a
//! validator only depends on the two fields of the error envelope it
//! cares about.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::response::ResponseCapture;

/// A validator's verdict on a response.
pub type ValidationResult = Result<(), AssertionError>;

/// The server behaved differently than a test case declared.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssertionError {
    /// Status code differs from the expected one.
    #[error("expected status {expected}, got {actual}")]
    StatusMismatch {
        /// Declared status code.
        expected: u16,
        /// Status code the server returned.
        actual: u16,
    },

    /// The error channel lacks part of the expected error signature.
    #[error("error response doesn't contain `{fragment}`")]
    MissingErrorFragment {
        /// The literal fragment that was searched for.
        fragment: String,
    },

    /// The effective response text lacks an expected substring.
    #[error("Server response doesn't contain: {needle}")]
    MissingSubstring {
        /// The substring that was searched for.
        needle: String,
    },
}

/// The `(error class, error code)` pair identifying a server-side failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorSignature {
    /// Fully qualified error kind, e.g. `org.apache.sqoop.server.common.ServerError`.
    pub class: String,
    /// Error code, e.g. `SERVER_0002`.
    pub code: String,
}

impl ErrorSignature {
    /// Creates a new error signature.
    pub fn new(class: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            code: code.into(),
        }
    }

    /// Literal fragment identifying the error class in the envelope.
    #[must_use]
    pub fn class_fragment(&self) -> String {
        format!("error-code-class\":\"{}", self.class)
    }

    /// Literal fragment identifying the error code in the envelope.
    #[must_use]
    pub fn code_fragment(&self) -> String {
        format!("error-code\":\"{}", self.code)
    }
}

impl fmt::Display for ErrorSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code, self.class)
    }
}

impl ResponseCapture {
    /// Asserts the response status equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::StatusMismatch`] naming both codes.
    pub const fn assert_status(&self, expected: u16) -> ValidationResult {
        if self.status == expected {
            Ok(())
        } else {
            Err(AssertionError::StatusMismatch {
                expected,
                actual: self.status,
            })
        }
    }

    /// Asserts the error channel carries the given error class and code.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::MissingErrorFragment`] for the first
    /// fragment not found in the error text.
    pub fn assert_server_error(&self, error_class: &str, error_code: &str) -> ValidationResult {
        self.assert_error_signature(&ErrorSignature::new(error_class, error_code))
    }

    /// Typed form of [`ResponseCapture::assert_server_error`].
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::MissingErrorFragment`] for the first
    /// fragment not found in the error text.
    pub fn assert_error_signature(&self, signature: &ErrorSignature) -> ValidationResult {
        for fragment in [signature.class_fragment(), signature.code_fragment()] {
            if !self.error_text.contains(&fragment) {
                return Err(AssertionError::MissingErrorFragment { fragment });
            }
        }
        Ok(())
    }

    /// Asserts the effective text contains `substring`.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionError::MissingSubstring`] naming the substring.
    pub fn assert_contains(&self, substring: &str) -> ValidationResult {
        if self.effective_text().contains(substring) {
            Ok(())
        } else {
            Err(AssertionError::MissingSubstring {
                needle: substring.to_string(),
            })
        }
    }
}
