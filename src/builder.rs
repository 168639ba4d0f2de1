use std::{error::Error, fmt, sync::Arc, time::Duration};

use reqwest::{Request, Response};

use crate::{
    client::{ClientConfig, HttpClient},
    policy::{self, Backoff, CheckRetry, ErrorHandler, ErrorHook, RequestHook, ResponseHook},
    ClientOptions, Executor, HttpClientError, MultiError, Result, RetryDecision,
};

/// Builds an [`HttpClient`].
///
/// Each method sets one field; calling a method again overrides the earlier
/// value.
#[derive(Clone)]
pub struct HttpClientBuilder {
    options: ClientOptions,
    executor: Option<Arc<dyn Executor>>,
    request_hook: Option<RequestHook>,
    response_hook: Option<ResponseHook>,
    error_hook: Option<ErrorHook>,
    check_retry: Option<CheckRetry>,
    backoff: Backoff,
    error_handler: Option<ErrorHandler>,
}

impl fmt::Debug for HttpClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClientBuilder")
            .field("options", &self.options)
            .field("executor", &self.executor.is_some())
            .field("request_hook", &self.request_hook.is_some())
            .field("response_hook", &self.response_hook.is_some())
            .field("error_hook", &self.error_hook.is_some())
            .field("check_retry", &self.check_retry.is_some())
            .field("error_handler", &self.error_handler.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            options: ClientOptions::default(),
            executor: None,
            request_hook: None,
            response_hook: None,
            error_hook: None,
            check_retry: None,
            backoff: Arc::new(policy::default_backoff),
            error_handler: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies base URL, retry count and timeout at once.
    pub fn options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Prefix prepended verbatim to the URL given to the verb methods.
    ///
    /// An empty string means no prefix.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.options.base_url = (!base_url.is_empty()).then_some(base_url);
        self
    }

    /// Number of retries after the initial attempt.
    pub fn retry_count(mut self, retry_count: usize) -> Self {
        self.options.retry_count = retry_count;
        self
    }

    /// Timeout of the default executor. Ignored when an executor is injected.
    ///
    /// Must be at least one millisecond; [`build`](Self::build) rejects zero.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Replaces the default `reqwest` executor.
    pub fn executor<E>(mut self, executor: E) -> Self
    where
        E: Executor + 'static,
    {
        self.executor = Some(Arc::new(executor));
        self
    }

    pub fn request_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Request, usize) + Send + Sync + 'static,
    {
        self.request_hook = Some(Arc::new(hook));
        self
    }

    pub fn response_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Request, &Response) + Send + Sync + 'static,
    {
        self.response_hook = Some(Arc::new(hook));
        self
    }

    pub fn error_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Request, &(dyn Error + Send + Sync), usize) + Send + Sync + 'static,
    {
        self.error_hook = Some(Arc::new(hook));
        self
    }

    /// Replaces the default retry policy (retry on status >= 500).
    pub fn check_retry<F>(mut self, check: F) -> Self
    where
        F: Fn(&Request, Option<&Response>, Option<&(dyn Error + Send + Sync)>) -> RetryDecision
            + Send
            + Sync
            + 'static,
    {
        self.check_retry = Some(Arc::new(check));
        self
    }

    /// Replaces the default constant 500 ms backoff.
    pub fn backoff<F>(mut self, backoff: F) -> Self
    where
        F: Fn(usize, Option<&Response>) -> Duration + Send + Sync + 'static,
    {
        self.backoff = Arc::new(backoff);
        self
    }

    /// Uses a shared backoff policy such as [`policy::exponential_backoff`].
    pub fn backoff_policy(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(Option<Response>, Option<MultiError>, usize) -> Result<Response>
            + Send
            + Sync
            + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    /// Finalizes the configuration.
    ///
    /// Builds a `reqwest::Client` with the configured timeout unless an
    /// executor was injected.
    pub fn build(self) -> Result<HttpClient> {
        let executor = match self.executor {
            Some(executor) => executor,
            None => {
                if self.options.timeout_ms == 0 {
                    return Err(HttpClientError::Config(
                        "timeout must be greater than zero".to_owned(),
                    ));
                }
                let client = reqwest::Client::builder()
                    .timeout(Duration::from_millis(self.options.timeout_ms))
                    .build()
                    .map_err(HttpClientError::Build)?;
                Arc::new(client)
            }
        };

        Ok(HttpClient::from_config(ClientConfig {
            base_url: self.options.base_url.filter(|url| !url.is_empty()),
            retry_count: self.options.retry_count,
            executor,
            request_hook: self.request_hook,
            response_hook: self.response_hook,
            error_hook: self.error_hook,
            check_retry: self.check_retry,
            backoff: self.backoff,
            error_handler: self.error_handler,
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::HttpClientBuilder;
    use crate::{ClientOptions, HttpClientError};

    #[test]
    fn later_calls_override_earlier_ones() {
        let builder = HttpClientBuilder::new()
            .retry_count(1)
            .retry_count(4)
            .base_url("https://a.example")
            .base_url("https://b.example");

        assert_eq!(builder.options.retry_count, 4);
        assert_eq!(builder.options.base_url.as_deref(), Some("https://b.example"));
    }

    #[test]
    fn empty_base_url_clears_prefix() {
        let builder = HttpClientBuilder::new().base_url("https://a.example").base_url("");
        assert_eq!(builder.options.base_url, None);
    }

    #[test]
    fn timeout_is_stored_in_millis() {
        let builder = HttpClientBuilder::new().timeout(Duration::from_secs(2));
        assert_eq!(builder.options.timeout_ms, 2_000);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = HttpClientBuilder::new()
            .timeout(Duration::ZERO)
            .build()
            .expect_err("zero timeout must fail");
        assert!(matches!(err, HttpClientError::Config(_)));
    }

    #[test]
    fn defaults_use_constant_backoff() {
        let builder = HttpClientBuilder::new();
        assert_eq!((builder.backoff)(3, None), Duration::from_millis(500));
        assert_eq!(builder.options, ClientOptions::default());
    }

    #[test]
    fn options_replace_plain_settings() {
        let builder = HttpClientBuilder::new().options(ClientOptions {
            base_url: Some("http://localhost:8080".to_owned()),
            retry_count: 2,
            timeout_ms: 10,
        });
        assert_eq!(builder.options.retry_count, 2);
        assert_eq!(builder.options.timeout_ms, 10);
    }

    #[test]
    fn build_creates_default_executor() {
        let client = HttpClientBuilder::new()
            .retry_count(3)
            .build()
            .expect("default executor must build");
        assert_eq!(client.retry_count(), 3);
        assert_eq!(client.base_url(), None);
    }

    #[test]
    fn debug_lists_configured_callbacks() {
        let builder = HttpClientBuilder::new().request_hook(|_, _| {});
        let debug = format!("{builder:?}");
        assert!(debug.contains("request_hook: true"));
        assert!(debug.contains("error_hook: false"));
    }
}
