//! Captured response type

use serde::{Deserialize, Serialize};

/// First status code whose body is delivered on the error channel.
pub const ERROR_STATUS_THRESHOLD: u16 = 400;

/// What the harness recorded about one executed request.
///
/// A response has two channels: the success channel carries the body of
/// a non-error status, the error channel the body of an error status
/// (400 and above). Both fields are always populated; the channel that
/// received nothing holds an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseCapture {
    /// HTTP status code
    pub status: u16,
    /// Success-channel text, empty if absent or unreadable
    pub success_text: String,
    /// Error-channel text, empty if absent
    pub error_text: String,
}

impl ResponseCapture {
    /// Creates a capture from already separated channel texts.
    #[must_use]
    pub fn new(
        status: u16,
        success_text: impl Into<String>,
        error_text: impl Into<String>,
    ) -> Self {
        Self {
            status,
            success_text: success_text.into(),
            error_text: error_text.into(),
        }
    }

    /// Creates a capture routing `body` to the channel `status` selects.
    #[must_use]
    pub fn from_body(status: u16, body: impl Into<String>) -> Self {
        if Self::is_error_status(status) {
            Self::new(status, String::new(), body)
        } else {
            Self::new(status, body, String::new())
        }
    }

    /// Returns true if `status` delivers its body on the error channel.
    #[must_use]
    pub const fn is_error_status(status: u16) -> bool {
        status >= ERROR_STATUS_THRESHOLD
    }

    /// Returns true if this response carries an error status.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        Self::is_error_status(self.status)
    }

    /// The text generic containment checks run against.
    ///
    /// This is the success-channel text when it is non-empty, otherwise
    /// the error-channel text. The two are never merged.
    #[must_use]
    pub fn effective_text(&self) -> &str {
        if self.success_text.is_empty() {
            &self.error_text
        } else {
            &self.success_text
        }
    }
}
