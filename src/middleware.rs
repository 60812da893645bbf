use axum::{
    extract::Request,
    http::uri::{PathAndQuery, Uri},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::info;

/// Collapse repeated slashes and drop a trailing slash, so `/api/movies/`
/// and `//api//movies` route like `/api/movies`.
pub fn normalized_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && normalized.ends_with('/') {
            continue;
        }
        normalized.push(c);
    }

    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    if normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}

pub async fn normalize_path(mut req: Request, next: Next) -> Response {
    let uri = req.uri();
    let normalized = normalized_path(uri.path());

    if normalized != uri.path() {
        let path_and_query = match uri.query() {
            Some(query) => format!("{}?{}", normalized, query),
            None => normalized,
        };

        let mut parts = uri.clone().into_parts();
        if let Ok(pq) = path_and_query.parse::<PathAndQuery>() {
            parts.path_and_query = Some(pq);
            if let Ok(new_uri) = Uri::from_parts(parts) {
                *req.uri_mut() = new_uri;
            }
        }
    }

    next.run(req).await
}

pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let content_length = response
        .headers()
        .get(axum::http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    info!(
        method = %method,
        url = %uri,
        status = status,
        length = content_length,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "HTTP request"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_path() {
        assert_eq!(normalized_path("/"), "/");
        assert_eq!(normalized_path("//"), "/");
        assert_eq!(normalized_path("/api/movies"), "/api/movies");
        assert_eq!(normalized_path("/api/movies/"), "/api/movies");
        assert_eq!(normalized_path("//api//movies"), "/api/movies");
        assert_eq!(normalized_path("/api///movies//"), "/api/movies");
    }
}
