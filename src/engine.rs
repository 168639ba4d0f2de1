use std::time::Duration;

use bytes::Bytes;
use http_body_util::BodyExt;
use reqwest::{header::HeaderMap, Body, Method, Request, Response, Url, Version};
use tokio::time::sleep;

use crate::{
    policy::is_retryable_status, HttpClient, HttpClientError, MultiError, Result, RetryDecision,
};

/// A request whose body has been read into memory so it can be sent again.
struct ReplayableRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    version: Version,
    body: Option<Bytes>,
}

impl ReplayableRequest {
    async fn capture(mut request: Request) -> Result<Self> {
        let body = match request.body_mut().take() {
            None => None,
            Some(body) => Some(match body.as_bytes() {
                Some(bytes) => Bytes::copy_from_slice(bytes),
                None => body
                    .collect()
                    .await
                    .map_err(HttpClientError::Body)?
                    .to_bytes(),
            }),
        };

        Ok(Self {
            method: request.method().clone(),
            url: request.url().clone(),
            headers: request.headers().clone(),
            timeout: request.timeout().copied(),
            version: request.version(),
            body,
        })
    }

    /// Builds a fresh request; its body reads the captured bytes from the start.
    fn attempt(&self) -> Request {
        let mut request = Request::new(self.method.clone(), self.url.clone());
        *request.headers_mut() = self.headers.clone();
        *request.timeout_mut() = self.timeout;
        *request.version_mut() = self.version;
        *request.body_mut() = self.body.clone().map(Body::from);
        request
    }
}

impl HttpClient {
    /// Sends `request`, retrying according to the configured policies.
    ///
    /// The body, if any, is read into memory first so that every attempt sends
    /// the same bytes. Up to `retry_count + 1` attempts are made.
    ///
    /// Without an error handler, the call succeeds only if no attempt failed
    /// and no check-retry policy reported an error; otherwise
    /// [`HttpClientError::Attempts`] carries every recorded message and the
    /// last response.
    ///
    /// Backoff waits happen inside the returned future, so dropping it (for
    /// example through `tokio::time::timeout`) cancels a pending wait.
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let config = &*self.config;
        let replay = ReplayableRequest::capture(request).await?;

        let mut errors = MultiError::new();
        let mut response: Option<Response> = None;
        let mut retries = 0usize;

        for attempt in 0..=config.retry_count {
            let has_next = attempt < config.retry_count;

            // Superseded responses are released before the next exchange.
            drop(response.take());

            let request = replay.attempt();
            if let Some(hook) = &config.request_hook {
                hook(&request, attempt);
            }

            #[cfg(feature = "tracing")]
            tracing::trace!(method = %request.method(), url = %request.url(), attempt, "sending request");

            // Buffered bodies always clone, so the fallback never runs in practice.
            let sent = request.try_clone().unwrap_or_else(|| replay.attempt());
            let outcome = config.executor.execute(sent).await;

            let retry = match outcome {
                Err(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(attempt, error = %err, "request attempt failed");

                    errors.push(err.to_string());
                    if let Some(hook) = &config.error_hook {
                        hook(&request, err.as_ref(), attempt);
                    }

                    if let Some(check) = &config.check_retry {
                        match check(&request, None, Some(err.as_ref())) {
                            RetryDecision::Retry => {}
                            RetryDecision::Stop => break,
                            RetryDecision::StopWith(check_err) => {
                                errors.push(check_err.to_string());
                                break;
                            }
                        }
                    }
                    has_next
                }
                Ok(resp) => {
                    if let Some(hook) = &config.response_hook {
                        hook(&request, &resp);
                    }

                    let decision = match &config.check_retry {
                        Some(check) if has_next => check(&request, Some(&resp), None),
                        Some(_) => RetryDecision::Stop,
                        None if has_next && is_retryable_status(resp.status()) => {
                            RetryDecision::Retry
                        }
                        None => RetryDecision::Stop,
                    };
                    response = Some(resp);

                    match decision {
                        RetryDecision::Retry => true,
                        RetryDecision::Stop => false,
                        RetryDecision::StopWith(check_err) => {
                            errors.push(check_err.to_string());
                            false
                        }
                    }
                }
            };

            if !retry {
                break;
            }

            let wait = (config.backoff)(attempt, response.as_ref());

            #[cfg(feature = "tracing")]
            tracing::debug!(attempt, wait_ms = wait.as_millis() as u64, "retrying request");

            sleep(wait).await;
            retries += 1;
        }

        if let Some(handler) = &config.error_handler {
            return handler(response, errors.into_option(), retries);
        }

        match response {
            Some(response) if errors.is_empty() => Ok(response),
            response => Err(HttpClientError::Attempts {
                errors,
                response: response.map(Box::new),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use reqwest::{header, Body, Method, Request, Url};

    use super::ReplayableRequest;

    fn request_with_body(body: Body) -> Request {
        let url = Url::parse("http://localhost/items").expect("static url must parse");
        let mut request = Request::new(Method::POST, url);
        request
            .headers_mut()
            .insert(header::CONTENT_TYPE, "application/json".parse().expect("valid header"));
        *request.body_mut() = Some(body);
        request
    }

    #[tokio::test]
    async fn buffered_body_is_replayed_on_every_attempt() {
        let replay = ReplayableRequest::capture(request_with_body(Body::from("{\"a\":1}")))
            .await
            .expect("body must be captured");

        for _ in 0..3 {
            let request = replay.attempt();
            assert_eq!(request.method(), Method::POST);
            assert_eq!(
                request.headers()[header::CONTENT_TYPE],
                "application/json"
            );
            assert_eq!(
                request.body().and_then(Body::as_bytes),
                Some(&b"{\"a\":1}"[..])
            );
        }
    }

    #[tokio::test]
    async fn streamed_body_is_collected() {
        let chunks = futures::stream::iter(vec![
            Ok::<_, std::io::Error>(Bytes::from_static(b"hello ")),
            Ok(Bytes::from_static(b"world")),
        ]);
        let replay = ReplayableRequest::capture(request_with_body(Body::wrap_stream(chunks)))
            .await
            .expect("stream must be collected");

        assert_eq!(replay.body.as_deref(), Some(&b"hello world"[..]));
        assert_eq!(
            replay.attempt().body().and_then(Body::as_bytes),
            Some(&b"hello world"[..])
        );
    }

    #[tokio::test]
    async fn request_without_body_stays_empty() {
        let url = Url::parse("http://localhost/items").expect("static url must parse");
        let replay = ReplayableRequest::capture(Request::new(Method::GET, url))
            .await
            .expect("empty request must be captured");
        assert!(replay.attempt().body().is_none());
    }
}
