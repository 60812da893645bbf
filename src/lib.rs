pub mod api;
pub mod config;
pub mod middleware;
pub mod omdb;
pub mod search;
pub mod server;
pub mod util;
pub mod view;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
    #[error("Server error: {0}")]
    Server(String),
}

pub async fn run(config_path: &str, debug_logs: bool) -> Result<(), ServerError> {
    let mut config = config::Config::from_file(config_path)?;
    config.apply_env()?;
    config.debug_logs = debug_logs;

    info!("Using config file: {}", config_path);
    info!("Search provider: {}", config.omdb.base_url);
    if config.omdb.api_key.is_empty() {
        warn!("No OMDb API key configured; every search will come back empty");
    }
    info!(
        title = %config.defaults.title,
        year = ?config.defaults.year,
        "Default search criteria"
    );
    if debug_logs {
        info!("Debug logging enabled");
    }

    let source = Arc::new(omdb::OmdbClient::new(&config.omdb)?);

    let address = config.listen.address.as_deref().unwrap_or("[::]");
    let port = &config.listen.port;
    let addr: SocketAddr = format!("{}:{}", address, port)
        .parse()
        .map_err(|e| ServerError::Server(format!("Invalid address: {}", e)))?;

    let tls = config.listen.tlscert.clone().zip(config.listen.tlskey.clone());

    let state = server::AppState::new(config, source);
    let app = server::build_router(state);

    if let Some((cert_path, key_path)) = tls {
        info!("Loading TLS certificate from {}", cert_path);
        info!("Loading TLS key from {}", key_path);

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(&cert_path, &key_path)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to load TLS config: {}", e)))?;

        info!("Serving HTTPS on {}", addr);

        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    } else {
        info!("Serving HTTP on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(format!("Server error: {}", e)))?;
    }

    Ok(())
}
