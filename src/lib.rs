//! `retry-http` is an async HTTP client wrapper with retry/backoff semantics.
//!
//! Requests go through an injected [`Executor`] (a `reqwest::Client` by
//! default). Around every attempt the client runs user policies:
//! - request, response and error hooks for observability
//! - a check-retry predicate and a backoff calculator for retry control
//! - an error handler that can replace the final result
//!
//! The convenience methods [`HttpClient::get`], [`HttpClient::post`],
//! [`HttpClient::put`] and [`HttpClient::delete`] build a request and hand it
//! to [`HttpClient::execute`].

mod builder;
mod client;
mod engine;
mod error;
mod executor;
mod multi_error;
mod options;
pub mod policy;

pub use builder::HttpClientBuilder;
pub use client::HttpClient;
pub use error::{BoxError, HttpClientError};
pub use executor::Executor;
pub use multi_error::MultiError;
pub use options::ClientOptions;
pub use policy::RetryDecision;

pub type Result<T> = std::result::Result<T, HttpClientError>;
