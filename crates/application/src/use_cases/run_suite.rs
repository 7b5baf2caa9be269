//! Run Suite Use Case
//!
//! Expands a case registry into units and runs them one after another,
//! wrapping every unit in fixture setup and teardown.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures::FutureExt;
use restprobe_domain::{
    ExpandedTestUnit, Link, LinkFixture, RunReport, TestCase, UnitOutcome, UnitReport, expand,
};
use tracing::{debug, error, info, warn};

use crate::error::ApplicationResult;
use crate::execute_request::ExecuteRequest;
use crate::ports::{FixtureClient, FixtureError, OutboundRequest, RequestExecutor};

/// Runs expanded units against a server with a per-unit link fixture.
///
/// Units share one fixture name and one server, so they are never run
/// concurrently: each unit is awaited to completion, teardown included,
/// before the next one starts.
pub struct SuiteRunner<E: RequestExecutor, F: FixtureClient> {
    execute: ExecuteRequest<E>,
    fixtures: Arc<F>,
    fixture: LinkFixture,
    base_url: String,
}

impl<E: RequestExecutor, F: FixtureClient> SuiteRunner<E, F> {
    /// Creates a runner sending requests relative to `base_url`.
    pub fn new(executor: Arc<E>, fixtures: Arc<F>, base_url: impl Into<String>) -> Self {
        Self {
            execute: ExecuteRequest::new(executor),
            fixtures,
            fixture: LinkFixture::default(),
            base_url: base_url.into(),
        }
    }

    /// Replaces the link created around each unit.
    #[must_use]
    pub fn with_fixture(mut self, fixture: LinkFixture) -> Self {
        self.fixture = fixture;
        self
    }

    /// The link created around each unit.
    #[must_use]
    pub const fn fixture(&self) -> &LinkFixture {
        &self.fixture
    }

    /// Expands `registry` under `suite_name` and runs every unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be expanded. Failures of
    /// individual units are recorded in the report instead.
    pub async fn run(
        &self,
        suite_name: &str,
        registry: &[TestCase],
    ) -> ApplicationResult<RunReport> {
        let units = expand(suite_name, registry)?;
        Ok(self.run_units(suite_name, &units).await)
    }

    /// Runs already expanded units in order.
    pub async fn run_units(&self, suite_name: &str, units: &[ExpandedTestUnit<'_>]) -> RunReport {
        let started_at = Utc::now();
        let start = Instant::now();

        let mut reports = Vec::with_capacity(units.len());
        for unit in units {
            reports.push(self.run_unit(unit).await);
        }

        let report = RunReport::new(suite_name, started_at, reports, elapsed_ms(start));
        info!(
            suite = suite_name,
            total = report.total,
            passed = report.passed,
            failed = report.failed,
            fatal = report.fatal,
            "suite finished"
        );
        report
    }

    /// Runs a single unit between fixture setup and teardown.
    ///
    /// Teardown is attempted on every path, including a failed setup and
    /// a panic anywhere between setup and validation.
    pub async fn run_unit(&self, unit: &ExpandedTestUnit<'_>) -> UnitReport {
        info!("Start: {}", unit.identifier());
        let start = Instant::now();

        let guarded = AssertUnwindSafe(async {
            match self.set_up().await {
                Ok(()) => self.exercise(unit).await,
                Err(e) => UnitOutcome::Fatal(format!("fixture setup failed: {e}")),
            }
        });
        let mut outcome = match guarded.catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => {
                UnitOutcome::Fatal(format!("unit panicked: {}", panic_message(&*panic)))
            }
        };

        let teardown_error = self.tear_down().await.err().map(|e| e.to_string());
        if let Some(message) = &teardown_error {
            warn!(unit = unit.identifier(), "fixture teardown failed: {message}");
            if outcome.is_passed() {
                outcome = UnitOutcome::Fatal(format!("fixture teardown failed: {message}"));
            }
        }

        match &outcome {
            UnitOutcome::Passed => {}
            UnitOutcome::Failed(reason) => {
                warn!(unit = unit.identifier(), "assertion failed: {reason}");
            }
            UnitOutcome::Fatal(reason) => {
                error!(unit = unit.identifier(), "unit aborted: {reason}");
            }
        }
        info!("End: {} [{}]", unit.identifier(), outcome.label());

        UnitReport {
            identifier: unit.identifier().to_string(),
            outcome,
            duration_ms: elapsed_ms(start),
            teardown_error,
        }
    }

    async fn exercise(&self, unit: &ExpandedTestUnit<'_>) -> UnitOutcome {
        let case = unit.case();
        let request = OutboundRequest::for_case(&self.base_url, case);

        let response = match self.execute.execute(&request).await {
            Ok(response) => response,
            Err(e) => return UnitOutcome::Fatal(e.to_string()),
        };

        match catch_unwind(AssertUnwindSafe(|| case.validate(&response))) {
            Ok(Ok(())) => UnitOutcome::Passed,
            Ok(Err(assertion)) => UnitOutcome::Failed(assertion),
            Err(panic) => {
                UnitOutcome::Fatal(format!("validator panicked: {}", panic_message(&*panic)))
            }
        }
    }

    async fn set_up(&self) -> Result<(), FixtureError> {
        let mut link: Link = self.fixtures.create_link(&self.fixture.connector_name).await?;
        self.fixture.apply_to(&mut link);
        self.fixtures.save_link(&link).await?;
        debug!(link = %self.fixture.name, "fixture link saved");
        Ok(())
    }

    async fn tear_down(&self) -> Result<(), FixtureError> {
        self.fixtures.delete_link(&self.fixture.name).await?;
        debug!(link = %self.fixture.name, "fixture link deleted");
        Ok(())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::significant_drop_tightening
)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use restprobe_domain::{AssertionError, ResponseCapture, Validator};
    use std::collections::{BTreeSet, HashMap};
    use std::sync::Mutex;

    use crate::ports::ExecutorError;

    const BASE_URL: &str = "http://localhost:12000/sqoop/";

    /// In-memory server: answers from the links it currently holds and
    /// records every call in `events`.
    #[derive(Default)]
    struct FakeServer {
        links: Mutex<BTreeSet<String>>,
        events: Mutex<Vec<String>>,
        fail_save: bool,
        fail_delete: bool,
        refuse: BTreeSet<String>,
        panic_on: BTreeSet<String>,
        panic_on_create: bool,
    }

    impl FakeServer {
        fn record(&self, event: impl Into<String>) {
            self.events.lock().unwrap().push(event.into());
        }

        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }

        fn holds(&self, name: &str) -> bool {
            self.links.lock().unwrap().contains(name)
        }
    }

    #[async_trait]
    impl RequestExecutor for FakeServer {
        async fn execute(
            &self,
            request: &OutboundRequest,
        ) -> Result<ResponseCapture, ExecutorError> {
            let path = request
                .url
                .strip_prefix(BASE_URL)
                .unwrap_or(&request.url)
                .to_string();
            self.record(format!("{} {path}", request.method));

            if self.panic_on.contains(&path) {
                panic!("transport blew up on {path}");
            }

            if self.refuse.contains(&path) {
                return Err(ExecutorError::ConnectionRefused {
                    host: "localhost".to_string(),
                    port: 12000,
                });
            }

            let capture = match path.as_str() {
                "version" => ResponseCapture::from_body(200, r#"{"build-version":"2.0.0"}"#),
                "v1/link/all" => {
                    let names: Vec<_> = self.links.lock().unwrap().iter().cloned().collect();
                    ResponseCapture::from_body(200, format!("{names:?}"))
                }
                other => match other.strip_prefix("v1/link/") {
                    Some(name) if self.holds(name) => ResponseCapture::from_body(200, name),
                    Some(name) => ResponseCapture::from_body(
                        500,
                        format!(
                            r#"{{"message":"Invalid link name: {name}","error-code":"SERVER_0006","error-code-class":"org.apache.sqoop.server.common.ServerError"}}"#
                        ),
                    ),
                    None => ResponseCapture::from_body(404, "not found"),
                },
            };
            Ok(capture)
        }
    }

    #[async_trait]
    impl FixtureClient for FakeServer {
        async fn create_link(&self, connector_name: &str) -> Result<Link, FixtureError> {
            self.record(format!("create {connector_name}"));
            assert!(!self.panic_on_create, "connector lookup blew up");
            Ok(Link::new(connector_name))
        }

        async fn save_link(&self, link: &Link) -> Result<(), FixtureError> {
            self.record(format!("save {}", link.name));
            if self.fail_save {
                return Err(FixtureError::UnexpectedStatus {
                    operation: "save link".to_string(),
                    status: 500,
                    body: String::new(),
                });
            }
            self.links.lock().unwrap().insert(link.name.clone());
            Ok(())
        }

        async fn delete_link(&self, name: &str) -> Result<(), FixtureError> {
            self.record(format!("delete {name}"));
            if self.fail_delete {
                return Err(FixtureError::Request(ExecutorError::Timeout(
                    "delete link".to_string(),
                )));
            }
            self.links.lock().unwrap().remove(name);
            Ok(())
        }

        async fn link_exists(&self, name: &str) -> Result<bool, FixtureError> {
            Ok(self.holds(name))
        }
    }

    fn runner(server: &Arc<FakeServer>) -> SuiteRunner<FakeServer, FakeServer> {
        SuiteRunner::new(Arc::clone(server), Arc::clone(server), BASE_URL)
    }

    fn link_case() -> TestCase {
        TestCase::get(
            "Get link by name",
            "v1/link/first-link",
            Validator::new(|response| {
                response.assert_status(200)?;
                response.assert_contains("first-link")
            }),
        )
        .unwrap()
    }

    fn registry() -> Vec<TestCase> {
        vec![
            TestCase::get("Valid", "version", Validator::status(200)).unwrap(),
            link_case(),
            TestCase::get(
                "Get non existing link",
                "v1/link/i-dont-exists",
                Validator::new(|response| {
                    response.assert_status(500)?;
                    response.assert_server_error(
                        "org.apache.sqoop.server.common.ServerError",
                        "SERVER_0006",
                    )?;
                    response.assert_contains("Invalid link name: i-dont-exists")
                }),
            )
            .unwrap(),
            TestCase::get(
                "Get all links",
                "v1/link/all",
                Validator::new(|r| r.assert_contains("first-link")),
            )
            .unwrap(),
        ]
    }

    #[tokio::test]
    async fn test_passing_unit_is_wrapped_in_fixture() {
        let server = Arc::new(FakeServer::default());
        let case = link_case();
        let unit = ExpandedTestUnit::new("S", &case);

        let report = runner(&server).run_unit(&unit).await;

        assert_eq!(report.outcome, UnitOutcome::Passed);
        assert_eq!(report.identifier, "S v1/link/first-link[GET]: Get link by name");
        assert_eq!(report.teardown_error, None);
        assert_eq!(
            server.events(),
            vec![
                "create generic-jdbc-connector",
                "save first-link",
                "GET v1/link/first-link",
                "delete first-link",
            ]
        );
        assert!(!server.holds("first-link"));
    }

    #[tokio::test]
    async fn test_assertion_failure_still_tears_down() {
        let server = Arc::new(FakeServer::default());
        let case = TestCase::get("Wrong expectation", "version", Validator::status(500)).unwrap();
        let unit = ExpandedTestUnit::new("S", &case);

        let report = runner(&server).run_unit(&unit).await;

        assert_eq!(
            report.outcome,
            UnitOutcome::Failed(AssertionError::StatusMismatch {
                expected: 500,
                actual: 200
            })
        );
        assert_eq!(server.events().last().map(String::as_str), Some("delete first-link"));
        assert!(!server.holds("first-link"));
    }

    #[tokio::test]
    async fn test_executor_error_is_fatal_and_tears_down() {
        let server = Arc::new(FakeServer {
            refuse: BTreeSet::from(["version".to_string()]),
            ..FakeServer::default()
        });
        let case = TestCase::get("Valid", "version", Validator::status(200)).unwrap();
        let unit = ExpandedTestUnit::new("S", &case);

        let report = runner(&server).run_unit(&unit).await;

        assert!(report.outcome.is_fatal());
        assert!(!report.outcome.is_failed());
        assert_eq!(server.events().last().map(String::as_str), Some("delete first-link"));
        assert!(!server.holds("first-link"));
    }

    #[tokio::test]
    async fn test_validator_panic_is_fatal_and_tears_down() {
        let server = Arc::new(FakeServer::default());
        let case = TestCase::get(
            "Panicking validator",
            "version",
            Validator::new(|_| panic!("validator blew up")),
        )
        .unwrap();
        let unit = ExpandedTestUnit::new("S", &case);

        let report = runner(&server).run_unit(&unit).await;

        assert_eq!(
            report.outcome,
            UnitOutcome::Fatal("validator panicked: validator blew up".to_string())
        );
        assert!(!server.holds("first-link"));
        assert_eq!(server.events().last().map(String::as_str), Some("delete first-link"));
    }

    #[tokio::test]
    async fn test_executor_panic_is_fatal_and_tears_down() {
        let server = Arc::new(FakeServer {
            panic_on: BTreeSet::from(["version".to_string()]),
            ..FakeServer::default()
        });
        let case = TestCase::get("Valid", "version", Validator::status(200)).unwrap();
        let unit = ExpandedTestUnit::new("S", &case);

        let report = runner(&server).run_unit(&unit).await;

        assert_eq!(
            report.outcome,
            UnitOutcome::Fatal("unit panicked: transport blew up on version".to_string())
        );
        assert_eq!(server.events().last().map(String::as_str), Some("delete first-link"));
        assert!(!server.holds("first-link"));
    }

    #[tokio::test]
    async fn test_setup_panic_is_fatal_and_tears_down() {
        let server = Arc::new(FakeServer {
            panic_on_create: true,
            ..FakeServer::default()
        });
        let case = TestCase::get("Valid", "version", Validator::status(200)).unwrap();
        let unit = ExpandedTestUnit::new("S", &case);

        let report = runner(&server).run_unit(&unit).await;

        assert_eq!(
            report.outcome,
            UnitOutcome::Fatal("unit panicked: connector lookup blew up".to_string())
        );
        assert_eq!(
            server.events(),
            vec!["create generic-jdbc-connector", "delete first-link"]
        );
    }

    #[tokio::test]
    async fn test_setup_failure_skips_request_but_tears_down() {
        let server = Arc::new(FakeServer {
            fail_save: true,
            ..FakeServer::default()
        });
        let case = TestCase::get("Valid", "version", Validator::status(200)).unwrap();
        let unit = ExpandedTestUnit::new("S", &case);

        let report = runner(&server).run_unit(&unit).await;

        assert!(matches!(
            &report.outcome,
            UnitOutcome::Fatal(message) if message.starts_with("fixture setup failed")
        ));
        assert_eq!(
            server.events(),
            vec![
                "create generic-jdbc-connector",
                "save first-link",
                "delete first-link",
            ]
        );
    }

    #[tokio::test]
    async fn test_teardown_failure_turns_pass_into_fatal() {
        let server = Arc::new(FakeServer {
            fail_delete: true,
            ..FakeServer::default()
        });
        let case = TestCase::get("Valid", "version", Validator::status(200)).unwrap();
        let unit = ExpandedTestUnit::new("S", &case);

        let report = runner(&server).run_unit(&unit).await;

        assert!(report.outcome.is_fatal());
        assert!(report.teardown_error.is_some());
    }

    #[tokio::test]
    async fn test_teardown_failure_keeps_assertion_failure() {
        let server = Arc::new(FakeServer {
            fail_delete: true,
            ..FakeServer::default()
        });
        let case = TestCase::get("Wrong expectation", "version", Validator::status(201)).unwrap();
        let unit = ExpandedTestUnit::new("S", &case);

        let report = runner(&server).run_unit(&unit).await;

        assert!(report.outcome.is_failed());
        assert!(report.teardown_error.is_some());
    }

    #[tokio::test]
    async fn test_run_executes_units_sequentially() {
        let server = Arc::new(FakeServer::default());
        let cases = registry();

        let report = runner(&server).run("S", &cases).await.unwrap();

        assert_eq!(report.total, 4);
        assert_eq!(report.passed, 4);
        assert!(report.all_passed());

        // Every request sits between its own save and delete.
        let events = server.events();
        let requests: Vec<_> = events
            .iter()
            .enumerate()
            .filter(|(_, e)| e.starts_with("GET "))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(requests.len(), 4);
        for index in requests {
            assert_eq!(events[index - 1], "save first-link");
            assert_eq!(events[index + 1], "delete first-link");
        }
        assert!(!server.link_exists("first-link").await.unwrap());
    }

    #[tokio::test]
    async fn test_unit_order_does_not_change_outcomes() {
        let cases = registry();
        let reversed: Vec<TestCase> = cases.iter().rev().cloned().collect();

        let forward_server = Arc::new(FakeServer::default());
        let forward = runner(&forward_server).run("S", &cases).await.unwrap();
        let backward_server = Arc::new(FakeServer::default());
        let backward = runner(&backward_server).run("S", &reversed).await.unwrap();

        let outcomes = |report: &RunReport| -> HashMap<String, UnitOutcome> {
            report
                .units
                .iter()
                .map(|u| (u.identifier.clone(), u.outcome.clone()))
                .collect()
        };
        assert_eq!(outcomes(&forward), outcomes(&backward));
    }

    #[tokio::test]
    async fn test_custom_fixture_name() {
        let server = Arc::new(FakeServer::default());
        let fixture = LinkFixture {
            name: "second-link".to_string(),
            ..LinkFixture::default()
        };
        let runner = runner(&server).with_fixture(fixture);
        let case =
            TestCase::get("Get link", "v1/link/second-link", Validator::status(200)).unwrap();
        let unit = ExpandedTestUnit::new("S", &case);

        let report = runner.run_unit(&unit).await;

        assert!(report.outcome.is_passed());
        assert_eq!(runner.fixture().name, "second-link");
        assert!(!server.holds("second-link"));
    }

    #[tokio::test]
    async fn test_run_rejects_duplicate_units() {
        let server = Arc::new(FakeServer::default());
        let cases = vec![
            TestCase::get("Valid", "version", Validator::status(200)).unwrap(),
            TestCase::get("Valid", "version", Validator::status(200)).unwrap(),
        ];

        let result = runner(&server).run("S", &cases).await;

        assert!(matches!(
            result,
            Err(crate::ApplicationError::Domain(
                restprobe_domain::DomainError::DuplicateUnit(_)
            ))
        ));
        assert!(server.events().is_empty());
    }
}
