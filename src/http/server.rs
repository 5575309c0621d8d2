//! HTTP server startup logic.

use std::net::SocketAddr;

use axum::Router;

use crate::config::AppConfig;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid http.host or http.port: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("Failed to bind server: {0}")]
    Bind(std::io::Error),

    #[error("Server error: {0}")]
    Server(std::io::Error),
}

/// Parse the configured listen address.
pub fn listen_addr(config: &AppConfig) -> Result<SocketAddr, ServerError> {
    Ok(format!("{}:{}", config.http.host, config.http.port).parse()?)
}

/// Start the HTTP server based on configuration.
///
/// This function blocks until the server shuts down.
pub async fn start_server(app: Router, config: &AppConfig) -> Result<(), ServerError> {
    let addr = listen_addr(config)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(ServerError::Bind)?;

    tracing::info!(%addr, "Starting HTTP server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await
        .map_err(ServerError::Server)?;

    tracing::info!("Server stopped");
    Ok(())
}
