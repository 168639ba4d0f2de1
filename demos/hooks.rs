use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use retry_http::{policy, HttpClient, RetryDecision};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = HttpClient::builder()
        .base_url("https://httpbin.org")
        .retry_count(3)
        .backoff_policy(policy::exponential_backoff(
            Duration::from_millis(200),
            Duration::from_secs(2),
        ))
        .request_hook(|request, attempt| {
            println!("attempt {attempt}: {} {}", request.method(), request.url());
        })
        .response_hook(|_, response| println!("  <- {}", response.status()))
        .error_hook(|_, err, attempt| println!("  attempt {attempt} failed: {err}"))
        .check_retry(|_, response, err| match (response, err) {
            (_, Some(_)) => RetryDecision::Retry,
            (Some(response), None) if response.status().is_server_error() => {
                RetryDecision::Retry
            }
            (Some(response), None) if response.status().as_u16() == 429 => {
                RetryDecision::StopWith("rate limited".into())
            }
            _ => RetryDecision::Stop,
        })
        .build()?;

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    match client
        .post("/status/500,200", r#"{"name":"Kit"}"#, headers)
        .await
    {
        Ok(response) => println!("final status: {}", response.status()),
        Err(err) => println!("request failed: {err}"),
    }

    Ok(())
}
