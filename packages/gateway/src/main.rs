//! `flowgate`: HTTP gateway for the flow engine.
//!
//! # Quick start
//!
//! ```sh
//! # Engine on the default socket, gateway on port 8080:
//! flowgate
//!
//! # Custom socket and a 5 second cap on every engine call:
//! FLOWGATE_ENGINE_SOCKET=/run/engine.sock FLOWGATE_ENGINE_TIMEOUT_SECS=5 flowgate
//! ```
//!
//! # Environment variables
//!
//! See [`GatewayConfig`] for the full list.

use std::sync::Arc;

use flowgate_gateway::{build_router, Engine, GatewayConfig, SocketEngine};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flowgate_gateway=info,flowgate=info,tower_http=debug".into()),
        )
        .init();

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(
        "engine: {} (timeout: {})",
        config.engine_socket.display(),
        config
            .engine_timeout
            .map_or_else(|| "none".to_string(), |t| format!("{}s", t.as_secs()))
    );
    tracing::info!("doubles rendered as {}", config.double_format);

    let engine: Arc<dyn Engine> = Arc::new(
        SocketEngine::new(config.engine_socket.clone()).with_timeout(config.engine_timeout),
    );

    let app = build_router(engine, config.clone());

    tracing::info!("listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {e}", config.bind_addr));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
