//! Wires the adapters together and runs the registry.

use std::sync::Arc;

use restprobe_application::{
    ApplicationError, CredentialSource, ExecutorError, FixtureClient, SuiteRunner,
};
use restprobe_domain::{DomainError, RunReport};
use restprobe_infrastructure::{
    ReqwestRequestExecutor, RestFixtureClient, StaticCredentials, TokenFileCredentials,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::HarnessConfig;
use crate::registry;

/// Exit code when every unit passed.
pub const EXIT_PASSED: u8 = 0;
/// Exit code when at least one assertion failed.
pub const EXIT_FAILED: u8 = 1;
/// Exit code for fatal units and unusable configuration.
pub const EXIT_FATAL: u8 = 2;

/// Errors that prevent a run from producing a report.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] ExecutorError),

    /// The registry is malformed.
    #[error("invalid registry: {0}")]
    Registry(#[from] DomainError),

    /// The registry could not be run.
    #[error(transparent)]
    Application(#[from] ApplicationError),
}

/// Picks the credential source for `config`.
///
/// A token file is only used when no inline token is configured.
#[must_use]
pub fn credential_source(config: &HarnessConfig) -> Arc<dyn CredentialSource> {
    if config.bearer_token.is_none()
        && let Some(path) = &config.bearer_token_file
    {
        return Arc::new(TokenFileCredentials::new(path));
    }
    Arc::new(StaticCredentials::new(config.credentials()))
}

/// Runs the registry against the server `config` points at.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the registry is
/// malformed. Unit failures are recorded in the report.
pub async fn run(config: &HarnessConfig) -> Result<RunReport, HarnessError> {
    let executor = Arc::new(ReqwestRequestExecutor::new(
        credential_source(config),
        config.timeout,
    )?);
    let fixtures = Arc::new(RestFixtureClient::new(
        Arc::clone(&executor),
        &config.base_url,
    ));
    let runner = SuiteRunner::new(executor, Arc::clone(&fixtures), &config.base_url);

    let cases = registry::rest_calls()?;
    info!(
        suite = %config.suite_name,
        base_url = %config.base_url,
        cases = cases.len(),
        "running registry"
    );
    let report = runner.run(&config.suite_name, &cases).await?;

    let fixture = &runner.fixture().name;
    match fixtures.link_exists(fixture).await {
        Ok(false) => {}
        Ok(true) => warn!(link = %fixture, "fixture link still exists after the run"),
        Err(e) => warn!(link = %fixture, "could not check for leftover fixture link: {e}"),
    }

    Ok(report)
}

/// Maps a report to the process exit code.
#[must_use]
pub const fn exit_code(report: &RunReport) -> u8 {
    if report.fatal > 0 {
        EXIT_FATAL
    } else if report.failed > 0 {
        EXIT_FAILED
    } else {
        EXIT_PASSED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use restprobe_domain::{AssertionError, Credentials, UnitOutcome, UnitReport};
    use std::path::PathBuf;

    fn report(outcomes: Vec<UnitOutcome>) -> RunReport {
        let units = outcomes
            .into_iter()
            .enumerate()
            .map(|(i, outcome)| UnitReport::new(format!("unit {i}"), outcome, 0))
            .collect();
        RunReport::new("suite", chrono::DateTime::default(), units, 0)
    }

    fn mismatch() -> UnitOutcome {
        UnitOutcome::Failed(AssertionError::StatusMismatch {
            expected: 200,
            actual: 500,
        })
    }

    #[tokio::test]
    async fn test_credential_source_selection() {
        let config = HarnessConfig {
            user: "sqoop".to_string(),
            ..HarnessConfig::default()
        };
        assert_eq!(
            credential_source(&config).credentials().await,
            Ok(Credentials::pseudo_user("sqoop"))
        );

        let config = HarnessConfig {
            bearer_token: Some("inline".to_string()),
            bearer_token_file: Some(PathBuf::from("/nonexistent/token")),
            ..HarnessConfig::default()
        };
        assert_eq!(
            credential_source(&config).credentials().await,
            Ok(Credentials::bearer("inline"))
        );

        let config = HarnessConfig {
            bearer_token_file: Some(PathBuf::from("/nonexistent/token")),
            ..HarnessConfig::default()
        };
        assert!(credential_source(&config).credentials().await.is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&report(vec![UnitOutcome::Passed])), EXIT_PASSED);
        assert_eq!(exit_code(&report(vec![])), EXIT_PASSED);
        assert_eq!(
            exit_code(&report(vec![UnitOutcome::Passed, mismatch()])),
            EXIT_FAILED
        );
        assert_eq!(
            exit_code(&report(vec![
                mismatch(),
                UnitOutcome::Fatal("connection refused".to_string()),
            ])),
            EXIT_FATAL
        );
    }
}
