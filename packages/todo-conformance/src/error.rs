//! Harness error types.

use thiserror::Error;

use crate::scenario::Step;

/// Failure of a scenario step.
///
/// Transport failures and contract violations share this type; the
/// message is what tells them apart in a report.
#[derive(Error, Debug)]
pub enum ConformanceError {
    /// The request never produced a complete response
    #[error("{step}: transport error: {source}")]
    Transport {
        step: Step,
        #[source]
        source: reqwest::Error,
    },

    /// The response violated the API contract
    #[error("{step}: expected {property} to be {expected}, got {actual}")]
    Contract {
        step: Step,
        property: String,
        expected: String,
        actual: String,
    },

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    ClientSetup(#[source] reqwest::Error),

    /// A request payload could not be encoded
    #[error("{step}: failed to encode request body: {source}")]
    Encode {
        step: Step,
        #[source]
        source: serde_json::Error,
    },
}

impl ConformanceError {
    /// Builds a contract violation.
    pub fn contract(
        step: Step,
        property: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        ConformanceError::Contract {
            step,
            property: property.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Step that failed, if the error belongs to one.
    pub fn step(&self) -> Option<Step> {
        match self {
            ConformanceError::Transport { step, .. }
            | ConformanceError::Contract { step, .. }
            | ConformanceError::Encode { step, .. } => Some(*step),
            ConformanceError::ClientSetup(_) => None,
        }
    }
}

/// Configuration errors, reported before any request is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Port value is not a valid TCP port
    #[error("Invalid port '{0}'")]
    InvalidPort(String),

    /// Base URL is not a plain http URL
    #[error("Invalid base URL '{0}': expected http://")]
    InvalidUrl(String),

    /// Timeout value is not a whole number of milliseconds
    #[error("Invalid timeout '{0}': expected milliseconds")]
    InvalidTimeout(String),
}
