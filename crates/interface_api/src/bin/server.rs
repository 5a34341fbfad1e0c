//! Claims Gateway - API Server Binary
//!
//! This binary starts the HTTP gateway in front of the claim store, identity,
//! policy, fraud and workflow services.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin claims-gateway
//!
//! # Run with environment variables
//! GATEWAY_PORT=8090 GATEWAY_REST_URL=http://localhost:8081 cargo run --bin claims-gateway
//! ```
//!
//! # Environment Variables
//!
//! * `GATEWAY_HOST` / `GATEWAY_PORT` - Listen address (default: 0.0.0.0:8090)
//! * `GATEWAY_REST_URL` - Claim store base URL
//! * `GATEWAY_SOAP_WSDL_URL` - Identity service WSDL
//! * `GATEWAY_GRAPHQL_URL` - Policy service GraphQL endpoint
//! * `GATEWAY_GRPC_ADDR` - Fraud service address
//! * `GATEWAY_GRPC_PACKAGE`, `GATEWAY_GRPC_SERVICE`, `GATEWAY_GRPC_METHOD` - Fraud method
//! * `GATEWAY_GRPC_DESCRIPTOR_PATH` - Optional descriptor set of the fraud service
//! * `GATEWAY_WORKFLOW_URL` - Workflow engine API root
//! * `GATEWAY_TIMEOUT_MS` - Deadline of every backend call (default: 10000)
//! * `GATEWAY_REJECTION_POLICY` - `halt` or `continue` (default: halt)
//! * `GATEWAY_LOG_LEVEL` - Log level when `RUST_LOG` is unset (default: info)

use std::net::SocketAddr;

use anyhow::Context;
use interface_api::{config::GatewayConfig, create_router, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = GatewayConfig::from_env().context("loading gateway configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        rest = %config.rest_url,
        soap = %config.soap_wsdl_url,
        graphql = %config.graphql_url,
        grpc = %config.grpc_addr,
        workflow = %config.workflow_url,
        "Starting claims gateway"
    );

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server_addr()))?;
    let state = AppState::from_config(config).context("building protocol adapters")?;
    let app = create_router(state);

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
