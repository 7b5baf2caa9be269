//! Application use cases (harness orchestration).

mod run_suite;

pub use run_suite::SuiteRunner;
