use std::{fmt, sync::Arc};

use reqwest::{header::HeaderMap, Body, Method, Request, Response, Url};

use crate::{
    policy::{Backoff, CheckRetry, ErrorHandler, ErrorHook, RequestHook, ResponseHook},
    ClientOptions, Executor, HttpClientBuilder, HttpClientError, Result,
};

/// Immutable configuration shared by every clone of a client.
pub(crate) struct ClientConfig {
    pub(crate) base_url: Option<String>,
    pub(crate) retry_count: usize,
    pub(crate) executor: Arc<dyn Executor>,
    pub(crate) request_hook: Option<RequestHook>,
    pub(crate) response_hook: Option<ResponseHook>,
    pub(crate) error_hook: Option<ErrorHook>,
    pub(crate) check_retry: Option<CheckRetry>,
    pub(crate) backoff: Backoff,
    pub(crate) error_handler: Option<ErrorHandler>,
}

#[derive(Clone)]
/// HTTP client that retries requests through an injected [`Executor`].
pub struct HttpClient {
    pub(crate) config: Arc<ClientConfig>,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.config.base_url)
            .field("retry_count", &self.config.retry_count)
            .field("check_retry", &self.config.check_retry.is_some())
            .field("error_handler", &self.config.error_handler.is_some())
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Creates a client with default settings and a `reqwest` executor.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Creates a client from `RETRY_HTTP_*` environment variables.
    ///
    /// See [`ClientOptions::from_env`] for the variables read.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use retry_http::HttpClient;
    ///
    /// let client = HttpClient::from_env().expect("invalid RETRY_HTTP_* env vars");
    /// ```
    pub fn from_env() -> Result<Self> {
        Self::builder().options(ClientOptions::from_env()?).build()
    }

    pub(crate) fn from_config(config: ClientConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn base_url(&self) -> Option<&str> {
        self.config.base_url.as_deref()
    }

    pub fn retry_count(&self) -> usize {
        self.config.retry_count
    }

    /// Sends a GET request to `url`, prefixed with the base URL if set.
    pub async fn get(&self, url: &str, headers: HeaderMap) -> Result<Response> {
        let request = self.build_request(Method::GET, url, None, headers)?;
        self.execute(request).await
    }

    /// Sends a POST request with `body`.
    pub async fn post(
        &self,
        url: &str,
        body: impl Into<Body>,
        headers: HeaderMap,
    ) -> Result<Response> {
        let request = self.build_request(Method::POST, url, Some(body.into()), headers)?;
        self.execute(request).await
    }

    /// Sends a PUT request with `body`.
    pub async fn put(
        &self,
        url: &str,
        body: impl Into<Body>,
        headers: HeaderMap,
    ) -> Result<Response> {
        let request = self.build_request(Method::PUT, url, Some(body.into()), headers)?;
        self.execute(request).await
    }

    /// Sends a DELETE request to `url`.
    pub async fn delete(&self, url: &str, headers: HeaderMap) -> Result<Response> {
        let request = self.build_request(Method::DELETE, url, None, headers)?;
        self.execute(request).await
    }

    fn build_request(
        &self,
        method: Method,
        url: &str,
        body: Option<Body>,
        headers: HeaderMap,
    ) -> Result<Request> {
        let target = self.target_url(url);
        let parsed = Url::parse(&target).map_err(|source| HttpClientError::RequestBuild {
            method: method.clone(),
            url: target.clone(),
            source,
        })?;

        let mut request = Request::new(method, parsed);
        *request.headers_mut() = headers;
        *request.body_mut() = body;
        Ok(request)
    }

    fn target_url(&self, url: &str) -> String {
        match &self.config.base_url {
            Some(base_url) => format!("{base_url}{url}"),
            None => url.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::{header::HeaderMap, Method};

    use super::HttpClient;
    use crate::HttpClientError;

    #[test]
    fn base_url_is_concatenated_without_normalization() {
        let client = HttpClient::builder()
            .base_url("https://api.example.com/v1")
            .build()
            .expect("client must build");

        assert_eq!(
            client.target_url("/users"),
            "https://api.example.com/v1/users"
        );
        assert_eq!(
            client.target_url("users"),
            "https://api.example.com/v1users"
        );
    }

    #[test]
    fn malformed_url_is_request_build_error() {
        let client = HttpClient::new().expect("client must build");
        let err = client
            .build_request(Method::PUT, "not a url", None, HeaderMap::new())
            .expect_err("url must be rejected");

        match err {
            HttpClientError::RequestBuild { method, url, .. } => {
                assert_eq!(method, Method::PUT);
                assert_eq!(url, "not a url");
            }
            other => panic!("expected request build error, got {other:?}"),
        }
    }

    #[test]
    fn debug_shows_plain_settings() {
        let client = HttpClient::builder()
            .base_url("http://localhost")
            .retry_count(2)
            .build()
            .expect("client must build");
        let debug = format!("{client:?}");
        assert!(debug.contains("http://localhost"));
        assert!(debug.contains("retry_count: 2"));
    }
}
