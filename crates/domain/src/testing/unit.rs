//! Expansion of a case registry into runnable units.

use std::collections::HashSet;

use crate::error::{DomainError, DomainResult};

use super::case::TestCase;

/// One independently runnable, individually named test unit.
///
/// The identifier is known before the unit runs so it can be reported
/// up front; execution never depends on any other unit.
#[derive(Debug, Clone)]
pub struct ExpandedTestUnit<'a> {
    identifier: String,
    case: &'a TestCase,
}

impl<'a> ExpandedTestUnit<'a> {
    /// Binds `case` under the naming scheme of `suite_name`.
    #[must_use]
    pub fn new(suite_name: &str, case: &'a TestCase) -> Self {
        Self {
            identifier: Self::identifier_for(suite_name, case),
            case,
        }
    }

    /// Formats `"<suite> <path>[<METHOD>]: <case name>"`.
    #[must_use]
    pub fn identifier_for(suite_name: &str, case: &TestCase) -> String {
        format!(
            "{suite_name} {}[{}]: {}",
            case.endpoint_path(),
            case.method(),
            case.name()
        )
    }

    /// Reporting identifier, unique within one expansion.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The bound test case.
    #[must_use]
    pub const fn case(&self) -> &'a TestCase {
        self.case
    }
}

/// Expands `registry` into one unit per case, preserving order.
///
/// Expansion performs no I/O and is deterministic.
///
/// # Errors
///
/// Returns [`DomainError::InvalidIdentifier`] for a blank suite name and
/// [`DomainError::DuplicateUnit`] if two cases share an identifier.
pub fn expand<'a>(
    suite_name: &str,
    registry: &'a [TestCase],
) -> DomainResult<Vec<ExpandedTestUnit<'a>>> {
    if suite_name.trim().is_empty() {
        return Err(DomainError::InvalidIdentifier(
            "suite name cannot be empty".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(registry.len());
    let mut units = Vec::with_capacity(registry.len());

    for case in registry {
        let unit = ExpandedTestUnit::new(suite_name, case);
        if !seen.insert(unit.identifier.clone()) {
            return Err(DomainError::DuplicateUnit(unit.identifier));
        }
        units.push(unit);
    }

    Ok(units)
}
