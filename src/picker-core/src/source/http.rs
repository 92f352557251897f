//! HTTP transport for remote sources.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::remote::Fetcher;
use crate::error::{SourceError, SourceResult};

/// `reqwest`-backed [`Fetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }

    /// Uses an existing client, e.g. one shared with the embedding application.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, params: &[(String, String)]) -> SourceResult<Value> {
        let response = self.client.get(url).query(params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_sends_params() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/search/people"))
            .and(wiremock::matchers::query_param("q", "bob"))
            .and(wiremock::matchers::query_param("limit", "3"))
            .respond_with(
                wiremock::ResponseTemplate::new(200).set_body_raw(
                    json!([{"name": "Bob Gobbs", "id": 4444}]).to_string(),
                    "application/json",
                ),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new();
        let url = format!("{}/search/people", server.uri());
        let params = [
            ("limit".to_string(), "3".to_string()),
            ("q".to_string(), "bob".to_string()),
        ];
        let body = fetcher.fetch(&url, &params).await.expect("fetch");
        assert_eq!(body, json!([{"name": "Bob Gobbs", "id": 4444}]));
    }

    #[tokio::test]
    async fn test_fetch_status_error() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = HttpFetcher::new()
            .fetch(&server.uri(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Status { status: 503 }));
    }

    #[tokio::test]
    async fn test_fetch_invalid_json() {
        let server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::with_client(reqwest::Client::new());
        let err = fetcher.fetch(&server.uri(), &[]).await.unwrap_err();
        assert!(matches!(err, SourceError::Json(_)));
    }
}
