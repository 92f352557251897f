//! Choice sources: given a query, produce candidate items.
//!
//! Both the in-memory [`LocalSource`] and the fetching [`RemoteSource`]
//! implement [`ChoiceSource`], so the controller awaits one contract and never
//! branches on where candidates come from.

mod http;
mod local;
mod remote;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SourceResult;
use crate::item::Item;

pub use http::HttpFetcher;
pub use local::LocalSource;
pub use remote::{Fetcher, RemoteSource};

/// Response of a choice source.
#[derive(Debug, Clone, PartialEq)]
pub enum ChoiceResponse {
    /// Candidates already in item form.
    Items(Vec<Item>),
    /// A raw response body; the results path is walked to reach the items.
    Raw(Value),
}

/// Produces candidates for a query.
#[async_trait]
pub trait ChoiceSource: Send + Sync {
    async fn get_choices(&self, query: &str) -> SourceResult<ChoiceResponse>;
}
