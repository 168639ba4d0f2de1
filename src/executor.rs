use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Request, Response};

use crate::BoxError;

/// Performs one request/response exchange.
///
/// This is the transport boundary of [`HttpClient`](crate::HttpClient):
/// implement it to inject an alternative transport or a test double.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Sends `request` and returns the response, or a transport-level error.
    async fn execute(&self, request: Request) -> Result<Response, BoxError>;
}

#[async_trait]
impl Executor for reqwest::Client {
    async fn execute(&self, request: Request) -> Result<Response, BoxError> {
        reqwest::Client::execute(self, request)
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl<E> Executor for Arc<E>
where
    E: Executor + ?Sized,
{
    async fn execute(&self, request: Request) -> Result<Response, BoxError> {
        (**self).execute(request).await
    }
}
