//! Remote candidate fetching.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{ChoiceResponse, ChoiceSource};
use crate::config::RemoteConfig;
use crate::error::SourceResult;

/// Transport issuing one GET-style request and returning the parsed body.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, params: &[(String, String)]) -> SourceResult<Value>;
}

/// Fetches candidates from a remote endpoint.
///
/// The base parameters are fixed at construction; every search gets a fresh
/// copy with the query inserted under the search key.
pub struct RemoteSource {
    url: String,
    search_key: String,
    base_params: Vec<(String, String)>,
    fetcher: Arc<dyn Fetcher>,
}

impl RemoteSource {
    pub fn new(
        url: impl Into<String>,
        extra_params: &BTreeMap<String, Value>,
        search_key: impl Into<String>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        let search_key = search_key.into();
        let mut base_params = Vec::new();
        for (name, value) in extra_params {
            if *name != search_key {
                push_param(&mut base_params, name, value);
            }
        }
        Self {
            url: url.into(),
            search_key,
            base_params,
            fetcher,
        }
    }

    pub fn from_config(config: &RemoteConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self::new(
            config.url.clone(),
            &config.extra_params,
            config.search_key.clone(),
            fetcher,
        )
    }

    /// Query parameters for one search.
    pub fn params_for(&self, query: &str) -> Vec<(String, String)> {
        let mut params = self.base_params.clone();
        params.push((self.search_key.clone(), query.to_string()));
        params
    }
}

impl std::fmt::Debug for RemoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSource")
            .field("url", &self.url)
            .field("search_key", &self.search_key)
            .field("base_params", &self.base_params)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ChoiceSource for RemoteSource {
    async fn get_choices(&self, query: &str) -> SourceResult<ChoiceResponse> {
        let params = self.params_for(query);
        match self.fetcher.fetch(&self.url, &params).await {
            Ok(body) => Ok(ChoiceResponse::Raw(body)),
            Err(err) => {
                if let Some(status) = err.status() {
                    tracing::warn!(url = %self.url, status, "Problem retrieving choices - {status} error");
                } else {
                    tracing::warn!(url = %self.url, "Problem retrieving choices: {err}");
                }
                Err(err)
            }
        }
    }
}

/// Serializes one parameter the way query strings expect: scalars as text,
/// arrays as a repeated key, objects as JSON, nulls dropped.
fn push_param(params: &mut Vec<(String, String)>, name: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::String(s) => params.push((name.to_string(), s.clone())),
        Value::Number(_) | Value::Bool(_) | Value::Object(_) => {
            params.push((name.to_string(), value.to_string()));
        }
        Value::Array(values) => {
            for value in values {
                push_param(params, name, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingFetcher {
        calls: Mutex<Vec<(String, Vec<(String, String)>)>>,
        fail_with: Option<u16>,
    }

    #[async_trait]
    impl Fetcher for RecordingFetcher {
        async fn fetch(&self, url: &str, params: &[(String, String)]) -> SourceResult<Value> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), params.to_vec()));
            match self.fail_with {
                Some(status) => Err(SourceError::Status { status }),
                None => Ok(json!([{"name": "Bob", "id": 1}])),
            }
        }
    }

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn test_params_for_merges_query() {
        let extra = BTreeMap::from([
            ("limit".to_string(), json!(3)),
            ("type".to_string(), json!("Client")),
        ]);
        let source = RemoteSource::new(
            "http://x/search",
            &extra,
            "Q",
            Arc::new(RecordingFetcher::default()),
        );

        assert_eq!(
            source.params_for("bob"),
            [pair("limit", "3"), pair("type", "Client"), pair("Q", "bob")]
        );
        // Each call starts from the base parameters again.
        assert_eq!(source.params_for("")[2], pair("Q", ""));
        assert_eq!(source.params_for("").len(), 3);
    }

    #[test]
    fn test_extra_param_named_like_search_key_is_replaced() {
        let extra = BTreeMap::from([("q".to_string(), json!("stale"))]);
        let source = RemoteSource::new("u", &extra, "q", Arc::new(RecordingFetcher::default()));
        assert_eq!(source.params_for("fresh"), [pair("q", "fresh")]);
    }

    #[test]
    fn test_param_serialization() {
        let mut params = Vec::new();
        push_param(&mut params, "ids", &json!([1, "two"]));
        push_param(&mut params, "skip", &Value::Null);
        push_param(&mut params, "flag", &json!(true));
        assert_eq!(params, [pair("ids", "1"), pair("ids", "two"), pair("flag", "true")]);
    }

    #[tokio::test]
    async fn test_get_choices_returns_raw_body() {
        let fetcher = Arc::new(RecordingFetcher::default());
        let source = RemoteSource::new("http://x/search", &BTreeMap::new(), "q", fetcher.clone());

        let response = source.get_choices("bo").await.expect("fetch");
        assert_eq!(
            response,
            ChoiceResponse::Raw(json!([{"name": "Bob", "id": 1}]))
        );

        let calls = fetcher.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "http://x/search");
        assert_eq!(calls[0].1, [pair("q", "bo")]);
    }

    #[tokio::test]
    async fn test_get_choices_propagates_failure() {
        let fetcher = Arc::new(RecordingFetcher {
            fail_with: Some(500),
            ..Default::default()
        });
        let source = RemoteSource::new("http://x", &BTreeMap::new(), "q", fetcher);
        let err = source.get_choices("bo").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
}
