//! Outcome and report types for executed units.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::generate_id_v7;

use super::assertion::AssertionError;

/// How a single unit ended.
///
/// Assertion failures and harness failures are kept apart so that "the
/// server behaved wrong" is never reported in the same bucket as "the
/// harness couldn't talk to the server".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum UnitOutcome {
    /// Every assertion held.
    Passed,
    /// The response diverged from the declared expectation.
    Failed(AssertionError),
    /// The unit could not be carried out.
    Fatal(String),
}

impl UnitOutcome {
    /// Returns true if the unit passed.
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Returns true if an assertion failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns true if the harness itself failed.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    /// Short label for log lines.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed(_) => "FAILED",
            Self::Fatal(_) => "FATAL",
        }
    }
}

/// Result of one executed unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitReport {
    /// Identifier of the unit.
    pub identifier: String,
    /// How the unit ended.
    pub outcome: UnitOutcome,
    /// Wall time including fixture setup and teardown.
    pub duration_ms: u64,
    /// Set when fixture teardown failed after the unit ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teardown_error: Option<String>,
}

impl UnitReport {
    /// Creates a report without a teardown error.
    pub fn new(identifier: impl Into<String>, outcome: UnitOutcome, duration_ms: u64) -> Self {
        Self {
            identifier: identifier.into(),
            outcome,
            duration_ms,
            teardown_error: None,
        }
    }
}

/// Summary of a whole suite run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Run identifier (UUID v7).
    pub run_id: String,
    /// Suite the units were expanded under.
    pub suite_name: String,
    /// When the first unit started.
    pub started_at: DateTime<Utc>,
    /// Per-unit reports in execution order.
    pub units: Vec<UnitReport>,
    /// Number of executed units.
    pub total: usize,
    /// Units that passed.
    pub passed: usize,
    /// Units with an assertion failure.
    pub failed: usize,
    /// Units that ended with a harness failure.
    pub fatal: usize,
    /// Total execution time in milliseconds.
    pub duration_ms: u64,
}

impl RunReport {
    /// Builds a report, deriving the counters from `units`.
    pub fn new(
        suite_name: impl Into<String>,
        started_at: DateTime<Utc>,
        units: Vec<UnitReport>,
        duration_ms: u64,
    ) -> Self {
        let total = units.len();
        let passed = units.iter().filter(|u| u.outcome.is_passed()).count();
        let failed = units.iter().filter(|u| u.outcome.is_failed()).count();
        let fatal = units.iter().filter(|u| u.outcome.is_fatal()).count();

        Self {
            run_id: generate_id_v7(),
            suite_name: suite_name.into(),
            started_at,
            units,
            total,
            passed,
            failed,
            fatal,
            duration_ms,
        }
    }

    /// Check if all units passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0 && self.fatal == 0
    }

    /// Get pass rate as percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }
}
