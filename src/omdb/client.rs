use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::model::{MovieSearchResponse, SearchPayload, SearchQuery};
use super::source::MovieSource;
use crate::config::OmdbConfig;

/// Search client for the OMDb API.
#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(config: &OmdbConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Query pairs sent to the provider. `y` is left out when no year is set.
    pub fn query_pairs(&self, query: &SearchQuery) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("apikey", self.api_key.clone()),
            ("s", query.title.clone().unwrap_or_default()),
            ("page", query.page.max(1).to_string()),
        ];
        if let Some(year) = query.year {
            pairs.push(("y", year.to_string()));
        }
        pairs
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<MovieSearchResponse, SearchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&self.query_pairs(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let payload: Option<SearchPayload> = serde_json::from_slice(&body)?;
        let Some(payload) = payload else {
            return Ok(MovieSearchResponse::empty());
        };

        if let Some(ref error) = payload.error {
            debug!(
                title = ?query.title,
                page = query.page,
                response = ?payload.response,
                "Provider returned error: {}",
                error
            );
        }

        Ok(payload.into())
    }
}

#[async_trait]
impl MovieSource for OmdbClient {
    async fn search(&self, query: &SearchQuery) -> MovieSearchResponse {
        match self.fetch(query).await {
            Ok(response) => {
                debug!(
                    title = ?query.title,
                    year = ?query.year,
                    page = query.page,
                    count = response.result.len(),
                    total = response.total_results,
                    "Movie search"
                );
                response
            }
            Err(e) => {
                warn!(
                    title = ?query.title,
                    year = ?query.year,
                    page = query.page,
                    "Movie search failed: {}",
                    e
                );
                MovieSearchResponse::empty()
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum SearchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),
}
