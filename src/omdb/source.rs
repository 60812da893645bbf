use async_trait::async_trait;

use super::model::{MovieSearchResponse, SearchQuery};

/// Anything that can answer a paginated movie search.
///
/// Implementations never fail: transport and payload errors degrade to an
/// empty response, so "no matches" and "request failed" look the same to
/// callers.
#[async_trait]
pub trait MovieSource: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> MovieSearchResponse;
}
