//! Shared test utilities: a mock upstream provider and an in-memory source.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use movie_search::omdb::{Movie, MovieSearchResponse, MovieSource, SearchQuery};
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const PAGE_SIZE: u64 = 10;

/// A canned upstream response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
}

impl MockResponse {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn error(status: u16) -> Self {
        Self {
            status,
            body: r#"{"Error": "boom"}"#.to_string(),
        }
    }
}

#[derive(Clone, Default)]
struct MockState {
    queries: Arc<Mutex<Vec<String>>>,
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
}

/// Stand-in for the OMDb API, served on a random local port.
pub struct MockProvider {
    pub addr: SocketAddr,
    state: MockState,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl MockProvider {
    pub async fn start() -> Self {
        let state = MockState::default();
        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

        let app = Router::new()
            .fallback(handle_request)
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock provider");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .ok();
        });

        Self {
            addr,
            state,
            shutdown: shutdown_tx,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn enqueue(&self, resp: MockResponse) {
        self.state.responses.lock().unwrap().push_back(resp);
    }

    /// Raw query strings of all requests received so far.
    pub fn queries(&self) -> Vec<String> {
        self.state.queries.lock().unwrap().clone()
    }
}

impl Drop for MockProvider {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

async fn handle_request(State(state): State<MockState>, RawQuery(query): RawQuery) -> Response {
    state
        .queries
        .lock()
        .unwrap()
        .push(query.unwrap_or_default());

    let resp = state
        .responses
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| MockResponse::json("{}"));

    let status = StatusCode::from_u16(resp.status).unwrap();
    (
        status,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        resp.body,
    )
        .into_response()
}

/// Provider-shaped JSON for `n` movies with ids `<prefix>0..`.
pub fn provider_page(prefix: &str, n: usize, total: &str) -> String {
    let movies: Vec<serde_json::Value> = (0..n)
        .map(|i| {
            serde_json::json!({
                "Title": format!("{} {}", prefix, i),
                "Year": "2000",
                "imdbID": format!("{}{}", prefix, i),
                "Type": "movie",
                "Poster": "N/A",
            })
        })
        .collect();
    serde_json::json!({
        "Search": movies,
        "totalResults": total,
        "Response": "True",
    })
    .to_string()
}

/// In-memory source: each title has a fixed result count served in pages of
/// ten, optionally after a delay.
#[derive(Default)]
pub struct FakeSource {
    totals: HashMap<String, u64>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<SearchQuery>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: &str, total: u64) -> Self {
        self.totals.insert(title.to_string(), total);
        self
    }

    pub fn with_delay(mut self, title: &str, delay: Duration) -> Self {
        self.delays.insert(title.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<SearchQuery> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MovieSource for FakeSource {
    async fn search(&self, query: &SearchQuery) -> MovieSearchResponse {
        self.calls.lock().unwrap().push(query.clone());

        let title = query.title.clone().unwrap_or_default();
        if let Some(delay) = self.delays.get(&title) {
            tokio::time::sleep(*delay).await;
        }

        let total = self.totals.get(&title).copied().unwrap_or(0);
        let start = (query.page.max(1) as u64 - 1) * PAGE_SIZE;
        let count = total.saturating_sub(start).min(PAGE_SIZE);

        MovieSearchResponse {
            result: (start..start + count)
                .map(|i| Movie {
                    imdb_id: format!("{}-{}", title, i),
                    title: format!("{} {}", title, i),
                    year: query.year.map(|y| y.to_string()).unwrap_or_default(),
                    poster: "N/A".to_string(),
                    ..Movie::default()
                })
                .collect(),
            total_results: total,
        }
    }
}
