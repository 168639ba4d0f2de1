use serde::Deserialize;

use crate::{HttpClientError, Result};

/// Plain-data client settings.
///
/// Callbacks and the executor are set on
/// [`HttpClientBuilder`](crate::HttpClientBuilder); these are the values that
/// can come from a config file or the environment.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientOptions {
    /// Prefix prepended verbatim to the URL given to the verb methods.
    pub base_url: Option<String>,
    /// Number of retries after the initial attempt.
    pub retry_count: usize,
    /// Timeout of the default executor in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: None,
            retry_count: 0,
            timeout_ms: 60_000,
        }
    }
}

impl ClientOptions {
    /// Reads options from environment variables.
    ///
    /// Reads:
    /// - `RETRY_HTTP_BASE_URL` — base URL prefix
    /// - `RETRY_HTTP_RETRY_COUNT` — retries after the first attempt
    /// - `RETRY_HTTP_TIMEOUT_MS` — default executor timeout
    ///
    /// Unset variables keep their default value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut options = Self::default();
        if let Some(base_url) = lookup("RETRY_HTTP_BASE_URL") {
            let trimmed = base_url.trim();
            if !trimmed.is_empty() {
                options.base_url = Some(trimmed.to_owned());
            }
        }
        if let Some(value) = lookup("RETRY_HTTP_RETRY_COUNT") {
            options.retry_count = parse_var("RETRY_HTTP_RETRY_COUNT", &value)?;
        }
        if let Some(value) = lookup("RETRY_HTTP_TIMEOUT_MS") {
            options.timeout_ms = parse_var("RETRY_HTTP_TIMEOUT_MS", &value)?;
            if options.timeout_ms == 0 {
                return Err(HttpClientError::Config(
                    "RETRY_HTTP_TIMEOUT_MS must be greater than zero".to_owned(),
                ));
            }
        }
        Ok(options)
    }
}

fn parse_var<T>(name: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|err| HttpClientError::Config(format!("invalid {name} '{value}': {err}")))
}
