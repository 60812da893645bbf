use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::warn;

use crate::omdb::{MovieSearchResponse, MovieSource, SearchQuery};

/// Searches through a running `/api/movies` endpoint.
#[derive(Clone)]
pub struct ProxyClient {
    client: Client,
    endpoint: String,
}

impl ProxyClient {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/api/movies", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Query pairs for `/api/movies`. `year` is always sent, blank when
    /// unset, so the server's default year does not apply.
    pub fn query_pairs(query: &SearchQuery) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", query.page.to_string()),
            ("year", query.year.map(|y| y.to_string()).unwrap_or_default()),
        ];
        if let Some(ref title) = query.title {
            pairs.push(("title", title.clone()));
        }
        pairs
    }

    async fn fetch(&self, query: &SearchQuery) -> Result<MovieSearchResponse, reqwest::Error> {
        self.client
            .get(&self.endpoint)
            .query(&Self::query_pairs(query))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[async_trait]
impl MovieSource for ProxyClient {
    async fn search(&self, query: &SearchQuery) -> MovieSearchResponse {
        match self.fetch(query).await {
            Ok(response) => response,
            Err(e) => {
                warn!(endpoint = %self.endpoint, page = query.page, "Proxy search failed: {}", e);
                MovieSearchResponse::empty()
            }
        }
    }
}
