use reqwest::{Method, Response};

use crate::MultiError;

/// Boxed error used for transport failures and policy-supplied errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum HttpClientError {
    /// The request could not be constructed; no attempt was made.
    #[error("{method} - request creation failed for '{url}': {source}")]
    RequestBuild {
        method: Method,
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// The request body could not be read into memory for replay.
    #[error("request body could not be buffered: {0}")]
    Body(#[source] reqwest::Error),
    /// The default `reqwest` executor could not be constructed.
    #[error("failed to build default executor: {0}")]
    Build(#[source] reqwest::Error),
    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),
    /// Errors accumulated across attempts.
    ///
    /// `response` is the last response received, if the final attempt
    /// produced one. The caller owns it.
    #[error("request failed: {errors}")]
    Attempts {
        errors: MultiError,
        response: Option<Box<Response>>,
    },
    /// Failure reported by a user-supplied error handler.
    #[error("{0}")]
    Handler(#[source] BoxError),
}

impl HttpClientError {
    /// Returns the accumulated attempt errors, if this is an attempt failure.
    pub fn attempt_errors(&self) -> Option<&MultiError> {
        match self {
            Self::Attempts { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// Takes the last response out of an attempt failure.
    pub fn into_response(self) -> Option<Response> {
        match self {
            Self::Attempts { response, .. } => response.map(|response| *response),
            _ => None,
        }
    }
}
