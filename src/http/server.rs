//! # HTTP Server
//!
//! Assembles the routers, applies CORS and request tracing, and runs the
//! serve loop. Shutdown is supervised: a ctrl-c logs the signal, stops the
//! listener gracefully and lets in-flight requests finish.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::health_routes::health_routes;
use super::product_routes::product_routes;
use super::AppState;
use crate::config::ServerConfig;
use crate::observability::{Logger, Severity};

/// HTTP server for the stockroom API
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new server with default configuration
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Create a new server with custom configuration
    pub fn with_config(config: ServerConfig) -> Self {
        let state = Arc::new(AppState::new());
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    /// Build the combined router
    pub fn build_router(config: &ServerConfig, state: Arc<AppState>) -> Router {
        // Permissive CORS when no origins are configured (development)
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            // Health check at root level
            .merge(health_routes(state.clone()))
            // Product routes under /api/products
            .nest("/api/products", product_routes(state))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the server and block until shutdown
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("{}", e)))?;

        let listener = TcpListener::bind(addr).await?;
        Logger::log(
            Severity::Info,
            "http_server_started",
            &[("addr", &addr.to_string())],
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Logger::log(Severity::Info, "http_server_stopped", &[]);
        Ok(())
    }
}

impl Default for HttpServer {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves when the process receives ctrl-c
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        Logger::log(Severity::Info, "shutdown_signal_received", &[]);
    }
}
