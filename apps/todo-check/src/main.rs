//! Runs the todo API conformance scenario against a live server.
//!
//! Exits with status 0 when every step passed and 1 otherwise.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use todo_conformance::config::{
    resolve_base_url, EXPECT_FIRST_ID_ENV, PORT_ENV, TIMEOUT_ENV, URL_ENV,
};
use todo_conformance::{HarnessConfig, IdExpectation, Scenario};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Full base URL of the server (e.g. http://localhost:3000)
    #[arg(long, env = URL_ENV)]
    url: Option<String>,

    /// Port on localhost, used when no URL is given
    #[arg(short, long, env = PORT_ENV)]
    port: Option<String>,

    /// Require the created item to get exactly this id
    #[arg(long, env = EXPECT_FIRST_ID_ENV)]
    expect_first_id: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long, env = TIMEOUT_ENV)]
    timeout_ms: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn harness_config(&self) -> anyhow::Result<HarnessConfig> {
        let base_url = resolve_base_url(self.url.as_deref(), self.port.as_deref())?;
        let mut config = HarnessConfig::new(&base_url)?;
        if let Some(id) = self.expect_first_id.as_ref().filter(|id| !id.is_empty()) {
            config = config.with_id_expectation(IdExpectation::Literal(id.clone()));
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_request_timeout_ms(timeout_ms);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = args.harness_config()?;
    tracing::info!(base_url = %config.base_url, "Running conformance scenario");

    let scenario = Scenario::new(&config).context("Failed to set up scenario")?;
    let report = scenario.run().await;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        println!("{}", report);
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_build_config() {
        let args = Args::try_parse_from([
            "todo-check",
            "--url",
            "http://127.0.0.1:4000/",
            "--expect-first-id",
            "0",
            "--timeout-ms",
            "250",
        ])
        .unwrap();
        let config = args.harness_config().unwrap();

        assert_eq!(config.base_url, "http://127.0.0.1:4000");
        assert_eq!(
            config.id_expectation,
            IdExpectation::Literal("0".to_string())
        );
        assert_eq!(config.request_timeout_ms, Some(250));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let args = Args {
            url: None,
            port: Some("http".to_string()),
            expect_first_id: None,
            timeout_ms: None,
            json: false,
        };
        let err = args.harness_config().unwrap_err();
        assert_eq!(err.to_string(), "Invalid port 'http'");
    }

    #[test]
    fn test_https_url_is_rejected() {
        let args = Args::try_parse_from(["todo-check", "--url", "https://todo.example.com"]).unwrap();
        let err = args.harness_config().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid base URL 'https://todo.example.com': expected http://"
        );
    }
}
