//! Callback contracts invoked by the retry loop, plus the stock policies.
//!
//! Every callback is an `Arc<dyn Fn ... + Send + Sync>` so a configured
//! client can be cloned and shared across tasks.

use std::{error::Error, sync::Arc, time::Duration};

use reqwest::{Request, Response, StatusCode};

use crate::{MultiError, Result};

/// Runs before every attempt with the attempt index (0 for the first try).
pub type RequestHook = Arc<dyn Fn(&Request, usize) + Send + Sync>;

/// Runs after every attempt that produced a response, whether or not another
/// attempt follows.
pub type ResponseHook = Arc<dyn Fn(&Request, &Response) + Send + Sync>;

/// Runs after every attempt that failed at the transport level.
pub type ErrorHook = Arc<dyn Fn(&Request, &(dyn Error + Send + Sync), usize) + Send + Sync>;

/// Decides whether an attempt's outcome warrants another attempt.
///
/// Called with the response on success or the transport error on failure.
pub type CheckRetry = Arc<
    dyn Fn(&Request, Option<&Response>, Option<&(dyn Error + Send + Sync)>) -> RetryDecision
        + Send
        + Sync,
>;

/// Computes how long to wait before the next attempt.
pub type Backoff = Arc<dyn Fn(usize, Option<&Response>) -> Duration + Send + Sync>;

/// Replaces the default result composition.
///
/// Receives the last response, the accumulated errors (`None` when nothing
/// failed) and the number of retries made after the first attempt. The
/// handler owns the response from here on.
pub type ErrorHandler =
    Arc<dyn Fn(Option<Response>, Option<MultiError>, usize) -> Result<Response> + Send + Sync>;

/// Outcome of a [`CheckRetry`] policy.
#[derive(Debug)]
pub enum RetryDecision {
    /// Make another attempt if any remain.
    Retry,
    /// Stop retrying and keep the current outcome.
    Stop,
    /// Stop retrying and record the error in the accumulated errors.
    StopWith(crate::BoxError),
}

impl RetryDecision {
    pub fn should_retry(&self) -> bool {
        matches!(self, Self::Retry)
    }
}

/// Delay used when no backoff policy is configured.
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

/// Waits [`DEFAULT_BACKOFF`] between every attempt.
pub fn default_backoff(_attempt: usize, _response: Option<&Response>) -> Duration {
    DEFAULT_BACKOFF
}

/// Retry predicate used when no [`CheckRetry`] is configured: server errors.
pub fn is_retryable_status(status: StatusCode) -> bool {
    status.as_u16() >= 500
}

/// Same delay before every retry.
pub fn constant_backoff(delay: Duration) -> Backoff {
    Arc::new(move |_, _| delay)
}

/// Doubles `base` with every attempt, capped at `max`.
pub fn exponential_backoff(base: Duration, max: Duration) -> Backoff {
    Arc::new(move |attempt, _| {
        let exp = attempt.min(16) as u32;
        base.saturating_mul(1u32 << exp).min(max)
    })
}
