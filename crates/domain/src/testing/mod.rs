//! Declarative response testing.
//!
//! A [`TestCase`] pairs a request description with a [`Validator`]; the
//! factory in [`expand`] turns a registry of cases into independently
//! runnable, individually named [`ExpandedTestUnit`]s, and the report
//! types record how each unit ended.

mod assertion;
mod case;
mod report;
mod unit;

pub use assertion::{AssertionError, ErrorSignature, ValidationResult};
pub use case::{TestCase, Validator};
pub use report::{RunReport, UnitOutcome, UnitReport};
pub use unit::{ExpandedTestUnit, expand};
