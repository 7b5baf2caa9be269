//! Restprobe binary.
//!
//! Runs the registry against the configured server, prints the JSON
//! report to stdout and exits with 0 (passed), 1 (assertion failures)
//! or 2 (fatal units or unusable configuration).

use std::process::ExitCode;

use restprobe::harness::EXIT_FATAL;
use restprobe::{HarnessConfig, exit_code, run};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match HarnessConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {e}");
            return ExitCode::from(EXIT_FATAL);
        }
    };

    info!("Starting restprobe v{}", env!("CARGO_PKG_VERSION"));

    let report = match run(&config).await {
        Ok(report) => report,
        Err(e) => {
            error!("{e}");
            return ExitCode::from(EXIT_FATAL);
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => error!("failed to encode report: {e}"),
    }

    ExitCode::from(exit_code(&report))
}
