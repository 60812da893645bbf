use axum::{extract::Request, http::StatusCode, response::IntoResponse, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::omdb::MovieSource;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub source: Arc<dyn MovieSource>,
}

impl AppState {
    pub fn new(config: Config, source: Arc<dyn MovieSource>) -> Self {
        Self {
            config: Arc::new(config),
            source,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new().route("/api/movies", get(crate::api::get_movies));

    let mut router = Router::new()
        .route("/", get(crate::api::index_page))
        .route("/robots.txt", get(robots_txt_handler))
        .merge(api_routes)
        .fallback(fallback_handler);

    if let Some(ref appdir) = state.config.appdir {
        router = router.fallback_service(ServeDir::new(appdir));
    }

    let app = router
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Layers on a Router run after routing, so the path rewrite wraps the
    // whole app from outside.
    Router::new()
        .fallback_service(app)
        .layer(axum::middleware::from_fn(crate::middleware::normalize_path))
}

async fn robots_txt_handler() -> &'static str {
    "User-agent: *\nDisallow: /api/\n"
}

async fn fallback_handler(req: Request<axum::body::Body>) -> impl IntoResponse {
    // CORS preflight for paths without a route.
    if req.method() == axum::http::Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
