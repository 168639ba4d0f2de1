use reqwest::header::HeaderMap;
use retry_http::HttpClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = HttpClient::from_env()?;
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "https://httpbin.org/status/503".to_owned());

    match client.get(&url, HeaderMap::new()).await {
        Ok(response) => println!("{} {}", response.status(), response.text().await?),
        Err(err) => println!("request failed: {err}"),
    }

    Ok(())
}
