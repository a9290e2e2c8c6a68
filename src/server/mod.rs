//! HTTP serving layer
//!
//! Small REST API over a fitted [`Recommender`]: the engine is built once
//! at startup and shared read-only across request handlers.

mod api;
mod error;

pub use api::create_router;
pub use error::ServerError;

use crate::engine::Recommender;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
        }
    }
}

/// State shared across handlers
pub struct AppState {
    pub recommender: Arc<Recommender>,
}

/// Start the server with the given configuration and fitted engine
pub async fn run_server(config: ServerConfig, recommender: Arc<Recommender>) -> anyhow::Result<()> {
    let state = Arc::new(AppState { recommender });
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(address = %addr, "Fertilizer recommendation API listening");
    info!(url = %format!("http://{}/api/health", addr), "Health endpoint available");

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Shutdown signal received, stopping server gracefully");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
