//! Integration tests running the registry against a fake server.
//!
//! The fake keeps the link store in memory, so cases that depend on the
//! `first-link` fixture only pass while the runner has it in place.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;
use restprobe::registry::{SERVER_ERROR_CLASS, rest_calls};
use restprobe::{HarnessConfig, exit_code, run};
use restprobe_application::SuiteRunner;
use restprobe_application::ports::{FixtureClient, OutboundRequest, RequestExecutor};
use restprobe_domain::{Credentials, HttpMethod, ResponseCapture, TestCase, UnitOutcome};
use restprobe_infrastructure::{ReqwestRequestExecutor, RestFixtureClient, StaticCredentials};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const USER: &str = "sqoop";

/// In-memory stand-in for the server's REST API.
#[derive(Clone, Default)]
struct FakeServer {
    link: Arc<Mutex<Option<String>>>,
    saves: Arc<AtomicUsize>,
    deletes: Arc<AtomicUsize>,
    reject_deletes: bool,
}

impl FakeServer {
    fn rejecting_deletes() -> Self {
        Self {
            reject_deletes: true,
            ..Self::default()
        }
    }

    fn server_error(code: &str, message: &str) -> ResponseTemplate {
        ResponseTemplate::new(500).set_body_string(format!(
            r#"{{"message":"{message}","error-code":"{code}","error-code-class":"{SERVER_ERROR_CLASS}"}}"#
        ))
    }

    fn links(&self) -> ResponseTemplate {
        let names: Vec<String> = self.link.lock().unwrap().iter().cloned().collect();
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "links": names
                .iter()
                .map(|name| serde_json::json!({ "name": name }))
                .collect::<Vec<_>>()
        }))
    }

    fn query(request: &Request, key: &str) -> Option<String> {
        request
            .url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

impl Respond for FakeServer {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        if Self::query(request, "user.name").as_deref() != Some(USER) {
            return ResponseTemplate::new(401);
        }

        let Some(path) = request.url.path().strip_prefix("/sqoop/") else {
            return ResponseTemplate::new(404);
        };

        match (request.method.as_str(), path) {
            ("GET", "version") => {
                ResponseTemplate::new(200).set_body_string(r#"{"build-version":"2.0.0"}"#)
            }
            ("POST", "version" | "v1/connector") => {
                Self::server_error("SERVER_0002", "Unsupported HTTP method")
            }
            (
                "GET",
                "v1/connector/all" | "v1/connector/1" | "v1/connector/generic-jdbc-connector",
            ) => ResponseTemplate::new(200)
                .set_body_string(r#"{"connectors":[{"id":1,"name":"generic-jdbc-connector"}]}"#),
            ("GET", "v1/connector/666") => {
                Self::server_error("SERVER_0006", "Entity requested doesn't exist")
            }
            ("GET", p) if p.starts_with("v1/connector/") => {
                let name = &p["v1/connector/".len()..];
                Self::server_error("SERVER_0005", &format!("Invalid connector: {name}"))
            }
            ("POST", "v1/link") => {
                let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
                let name = body["link"]["name"].as_str().unwrap().to_string();
                *self.link.lock().unwrap() = Some(name);
                self.saves.fetch_add(1, Ordering::SeqCst);
                ResponseTemplate::new(200)
            }
            ("GET", "v1/link/all") => match Self::query(request, "cname").as_deref() {
                None | Some("generic-jdbc-connector") => self.links(),
                Some(other) => {
                    Self::server_error("SERVER_0005", &format!("Invalid connector: {other}"))
                }
            },
            ("GET", p) if p.starts_with("v1/link/") => {
                let name = &p["v1/link/".len()..];
                if self.link.lock().unwrap().as_deref() == Some(name) {
                    ResponseTemplate::new(200)
                        .set_body_string(format!(r#"{{"links":[{{"name":"{name}"}}]}}"#))
                } else {
                    Self::server_error("SERVER_0006", &format!("Invalid link name: {name}"))
                }
            }
            ("DELETE", p) if p.starts_with("v1/link/") => {
                self.deletes.fetch_add(1, Ordering::SeqCst);
                if self.reject_deletes {
                    return Self::server_error("SERVER_0000", "Delete refused");
                }
                let name = &p["v1/link/".len()..];
                let mut link = self.link.lock().unwrap();
                if link.as_deref() == Some(name) {
                    *link = None;
                    ResponseTemplate::new(200)
                } else {
                    Self::server_error("SERVER_0006", &format!("Invalid link name: {name}"))
                }
            }
            _ => ResponseTemplate::new(404),
        }
    }
}

async fn start(fake: FakeServer) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(any()).respond_with(fake).mount(&server).await;
    server
}

fn config(base_url: String) -> HarnessConfig {
    HarnessConfig {
        base_url,
        user: USER.to_string(),
        timeout: Some(Duration::from_secs(5)),
        ..HarnessConfig::default()
    }
}

fn base_url(server: &MockServer) -> String {
    format!("{}/sqoop/", server.uri())
}

/// Base URL on a local port nothing listens on.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/sqoop/")
}

fn executor() -> Arc<ReqwestRequestExecutor> {
    let credentials = Arc::new(StaticCredentials::new(Credentials::pseudo_user(USER)));
    Arc::new(ReqwestRequestExecutor::new(credentials, Some(Duration::from_secs(5))).unwrap())
}

fn registry_case(path: &str, method: HttpMethod) -> TestCase {
    rest_calls()
        .unwrap()
        .into_iter()
        .find(|c| c.endpoint_path() == path && c.method() == method)
        .unwrap()
}

async fn execute(server: &MockServer, case: &TestCase) -> ResponseCapture {
    executor()
        .execute(&OutboundRequest::for_case(&base_url(server), case))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_registry_passes_against_conforming_server() {
    let fake = FakeServer::default();
    let server = start(fake.clone()).await;

    let report = run(&config(base_url(&server))).await.unwrap();

    for unit in &report.units {
        assert!(unit.outcome.is_passed(), "{}: {:?}", unit.identifier, unit.outcome);
    }
    assert_eq!(report.total, 13);
    assert_eq!(exit_code(&report), 0);

    // One fixture per unit, always cleaned up.
    assert_eq!(fake.saves.load(Ordering::SeqCst), 13);
    assert_eq!(fake.deletes.load(Ordering::SeqCst), 13);
    assert_eq!(*fake.link.lock().unwrap(), None);
}

#[tokio::test]
async fn test_version_returns_ok() {
    let server = start(FakeServer::default()).await;
    let case = registry_case("version", HttpMethod::Get);

    let capture = execute(&server, &case).await;

    assert_eq!(capture.status, 200);
    assert_eq!(capture.error_text, "");
    assert_eq!(case.validate(&capture), Ok(()));
}

#[tokio::test]
async fn test_post_to_version_is_rejected() {
    let server = start(FakeServer::default()).await;
    let case = registry_case("version", HttpMethod::Post);

    let capture = execute(&server, &case).await;

    assert_eq!(capture.status, 500);
    assert_eq!(capture.success_text, "");
    assert_eq!(capture.assert_server_error(SERVER_ERROR_CLASS, "SERVER_0002"), Ok(()));
    assert_eq!(case.validate(&capture), Ok(()));
}

#[tokio::test]
async fn test_unknown_link_is_reported() {
    let server = start(FakeServer::default()).await;
    let case = registry_case("v1/link/i-dont-exists", HttpMethod::Get);

    let capture = execute(&server, &case).await;

    assert_eq!(capture.status, 500);
    assert_eq!(capture.assert_server_error(SERVER_ERROR_CLASS, "SERVER_0006"), Ok(()));
    assert_eq!(capture.assert_contains("Invalid link name: i-dont-exists"), Ok(()));
}

#[tokio::test]
async fn test_links_for_connector_need_the_fixture() {
    let server = start(FakeServer::default()).await;
    let case = registry_case("v1/link/all?cname=generic-jdbc-connector", HttpMethod::Get);

    // Without the fixture the link is missing.
    let capture = execute(&server, &case).await;
    assert_eq!(capture.status, 200);
    assert!(case.validate(&capture).is_err());

    // With it, the case passes.
    let fixtures = RestFixtureClient::new(executor(), base_url(&server));
    let mut link = fixtures.create_link("generic-jdbc-connector").await.unwrap();
    restprobe_domain::LinkFixture::default().apply_to(&mut link);
    fixtures.save_link(&link).await.unwrap();

    let capture = execute(&server, &case).await;
    assert_eq!(capture.status, 200);
    assert_eq!(capture.assert_contains("first-link"), Ok(()));

    fixtures.delete_link("first-link").await.unwrap();
    assert!(!fixtures.link_exists("first-link").await.unwrap());
}

#[tokio::test]
async fn test_permissive_server_fails_assertions() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let report = run(&config(base_url(&server))).await.unwrap();

    assert_eq!(report.fatal, 0);
    assert!(report.failed > 0);
    assert!(report.passed > 0);
    assert_eq!(exit_code(&report), 1);
}

#[tokio::test]
async fn test_unreachable_server_is_fatal() {
    let report = run(&config(closed_port_url())).await.unwrap();

    assert_eq!(report.fatal, report.total);
    for unit in &report.units {
        match &unit.outcome {
            UnitOutcome::Fatal(reason) => assert!(
                reason.starts_with("fixture setup failed: connection refused by 127.0.0.1:"),
                "{reason}"
            ),
            other => panic!("expected fatal outcome, got {other:?}"),
        }
    }
    assert_eq!(exit_code(&report), 2);
}

#[tokio::test]
async fn test_connection_failure_on_request_is_fatal_not_failed() {
    let fake = FakeServer::default();
    let server = start(fake.clone()).await;
    let executor = executor();
    let fixtures = Arc::new(RestFixtureClient::new(
        Arc::clone(&executor),
        base_url(&server),
    ));
    let runner = SuiteRunner::new(executor, fixtures, closed_port_url());
    let cases = rest_calls().unwrap();

    let report = runner.run("restprobe::registry", &cases).await.unwrap();

    assert_eq!(report.failed, 0);
    assert_eq!(report.fatal, 13);
    for unit in &report.units {
        assert_eq!(unit.teardown_error, None);
        match &unit.outcome {
            UnitOutcome::Fatal(reason) => {
                assert!(reason.starts_with("connection refused by 127.0.0.1:"), "{reason}");
            }
            other => panic!("expected fatal outcome, got {other:?}"),
        }
    }
    assert_eq!(exit_code(&report), 2);

    // The fixture still went up and came down around every unit.
    assert_eq!(fake.saves.load(Ordering::SeqCst), 13);
    assert_eq!(fake.deletes.load(Ordering::SeqCst), 13);
    assert_eq!(*fake.link.lock().unwrap(), None);
}

#[tokio::test]
async fn test_missing_token_file_is_fatal() {
    let fake = FakeServer::default();
    let server = start(fake.clone()).await;
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = HarnessConfig {
        bearer_token_file: Some(dir.path().join("token")),
        ..config(base_url(&server))
    };

    let report = run(&config).await.unwrap();

    assert_eq!(report.fatal, report.total);
    for unit in &report.units {
        match &unit.outcome {
            UnitOutcome::Fatal(reason) => assert!(
                reason.starts_with("fixture setup failed: no credentials available"),
                "{reason}"
            ),
            other => panic!("expected fatal outcome, got {other:?}"),
        }
    }
    assert_eq!(fake.saves.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failed_teardown_is_recorded() {
    let fake = FakeServer::rejecting_deletes();
    let server = start(fake.clone()).await;

    let report = run(&config(base_url(&server))).await.unwrap();

    assert_eq!(fake.deletes.load(Ordering::SeqCst), 13);
    assert!(report.units.iter().all(|u| u.teardown_error.is_some()));
    assert_eq!(report.passed, 0);
    assert_eq!(exit_code(&report), 2);
}
