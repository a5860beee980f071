//! Harness configuration.

use std::env;

use crate::error::ConfigError;

/// Port used when neither a URL nor a port is configured.
pub const DEFAULT_PORT: u16 = 3000;

/// Environment variable holding a full base URL.
pub const URL_ENV: &str = "TODO_API_URL";
/// Environment variable holding the server port.
pub const PORT_ENV: &str = "PORT";
/// Environment variable holding the id the first created item must get.
pub const EXPECT_FIRST_ID_ENV: &str = "TODO_EXPECT_FIRST_ID";
/// Environment variable holding the per-request timeout in milliseconds.
pub const TIMEOUT_ENV: &str = "TODO_TIMEOUT_MS";

/// What the harness demands of the id assigned by create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum IdExpectation {
    /// Later steps must echo whatever id create returned.
    #[default]
    Returned,
    /// Create must have assigned exactly this id, e.g. `"0"` on a fresh server.
    Literal(String),
}

impl IdExpectation {
    /// The id later steps must report, given the one create returned.
    pub fn expected<'a>(&'a self, returned: &'a str) -> &'a str {
        match self {
            IdExpectation::Returned => returned,
            IdExpectation::Literal(id) => id,
        }
    }
}

/// Harness configuration.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Server root, without trailing slash (e.g. `http://localhost:3000`)
    pub base_url: String,
    /// Id check applied from the retrieve step on
    pub id_expectation: IdExpectation,
    /// Per-request timeout; `None` keeps the client default
    pub request_timeout_ms: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: format!("http://localhost:{}", DEFAULT_PORT),
            id_expectation: IdExpectation::Returned,
            request_timeout_ms: None,
        }
    }
}

impl HarnessConfig {
    /// Creates a configuration targeting `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: resolve_base_url(Some(base_url), None)?,
            ..Default::default()
        })
    }

    /// Builds a configuration from `TODO_API_URL`, `PORT`, `TODO_EXPECT_FIRST_ID`
    /// and `TODO_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from the same variables as [`HarnessConfig::from_env`],
    /// read through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let base_url = resolve_base_url(get(URL_ENV).as_deref(), get(PORT_ENV).as_deref())?;

        let id_expectation = match get(EXPECT_FIRST_ID_ENV) {
            Some(id) => IdExpectation::Literal(id),
            None => IdExpectation::Returned,
        };

        let request_timeout_ms = match get(TIMEOUT_ENV) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?,
            ),
            None => None,
        };

        Ok(Self {
            base_url,
            id_expectation,
            request_timeout_ms,
        })
    }

    /// Sets the id expectation.
    pub fn with_id_expectation(mut self, id_expectation: IdExpectation) -> Self {
        self.id_expectation = id_expectation;
        self
    }

    /// Sets a per-request timeout.
    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = Some(timeout_ms);
        self
    }
}

/// Resolves the server root from an explicit URL or a port.
///
/// A non-empty URL wins. Otherwise the port (or [`DEFAULT_PORT`]) on
/// `localhost` is used. Only plain `http://` URLs are accepted: the client
/// is built without TLS support.
pub fn resolve_base_url(url: Option<&str>, port: Option<&str>) -> Result<String, ConfigError> {
    if let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) {
        if !url.starts_with("http://") {
            return Err(ConfigError::InvalidUrl(url.to_string()));
        }
        return Ok(url.trim_end_matches('/').to_string());
    }

    let port = match port.map(str::trim).filter(|p| !p.is_empty()) {
        Some(raw) => match raw.parse::<u16>() {
            Ok(port) if port != 0 => port,
            _ => return Err(ConfigError::InvalidPort(raw.to_string())),
        },
        None => DEFAULT_PORT,
    };
    Ok(format!("http://localhost:{}", port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_local_port_3000() {
        assert_eq!(
            resolve_base_url(None, None).unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            resolve_base_url(Some(""), Some("  ")).unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(HarnessConfig::default().base_url, "http://localhost:3000");
    }

    #[test]
    fn test_port_from_environment_value() {
        assert_eq!(
            resolve_base_url(None, Some("8081")).unwrap(),
            "http://localhost:8081"
        );
    }

    #[test]
    fn test_url_takes_precedence_over_port() {
        assert_eq!(
            resolve_base_url(Some("http://10.0.0.5:9000/"), Some("8081")).unwrap(),
            "http://10.0.0.5:9000"
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert_eq!(
            resolve_base_url(None, Some("abc")),
            Err(ConfigError::InvalidPort("abc".to_string()))
        );
        assert_eq!(
            resolve_base_url(None, Some("0")),
            Err(ConfigError::InvalidPort("0".to_string()))
        );
        assert_eq!(
            resolve_base_url(Some("localhost:3000"), None),
            Err(ConfigError::InvalidUrl("localhost:3000".to_string()))
        );
    }

    #[test]
    fn test_https_rejected_before_any_request() {
        assert_eq!(
            resolve_base_url(Some("https://127.0.0.1:1"), None),
            Err(ConfigError::InvalidUrl("https://127.0.0.1:1".to_string()))
        );
        let err = HarnessConfig::new("https://127.0.0.1:1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid base URL 'https://127.0.0.1:1': expected http://"
        );
    }

    fn lookup_from<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_lookup_reads_every_variable() {
        let config = HarnessConfig::from_lookup(lookup_from(&[
            (PORT_ENV, "8081"),
            (EXPECT_FIRST_ID_ENV, "0"),
            (TIMEOUT_ENV, "1500"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8081");
        assert_eq!(config.id_expectation, IdExpectation::Literal("0".to_string()));
        assert_eq!(config.request_timeout_ms, Some(1500));

        let config = HarnessConfig::from_lookup(lookup_from(&[
            (URL_ENV, "http://todo.internal:9000/"),
            (PORT_ENV, "8081"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://todo.internal:9000");
        assert_eq!(config.id_expectation, IdExpectation::Returned);
        assert_eq!(config.request_timeout_ms, None);
    }

    #[test]
    fn test_lookup_with_nothing_set_matches_default() {
        let config = HarnessConfig::from_lookup(lookup_from(&[(EXPECT_FIRST_ID_ENV, "")])).unwrap();
        let default = HarnessConfig::default();
        assert_eq!(config.base_url, default.base_url);
        assert_eq!(config.id_expectation, default.id_expectation);
        assert_eq!(config.request_timeout_ms, default.request_timeout_ms);
    }

    #[test]
    fn test_lookup_rejects_bad_timeout() {
        let err = HarnessConfig::from_lookup(lookup_from(&[(TIMEOUT_ENV, "soon")])).unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimeout("soon".to_string()));
    }

    #[test]
    fn test_id_expectation() {
        assert_eq!(IdExpectation::Returned.expected("17"), "17");
        assert_eq!(IdExpectation::Literal("0".to_string()).expected("17"), "0");
    }
}
