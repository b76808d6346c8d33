//! Modelmux — stateless HTTP gateway in front of external AI provider APIs.
//!
//! Startup sequence:
//! 1. Initialize logging
//! 2. Read the immutable gateway config from the environment
//! 3. Build the shared dispatch client
//! 4. Bind the configured port and serve

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use modelmux_core::GatewayConfig;
use modelmux_providers::ProviderClient;
use modelmux_server::create_router;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = GatewayConfig::from_env();
    let port = config.port;

    if config.openai_api_key.is_empty() {
        tracing::warn!("OPENAI_API_KEY is not set; OpenAI-backed endpoints will be rejected upstream");
    }
    if config.anthropic_api_key.is_empty() {
        tracing::warn!("ANTHROPIC_API_KEY is not set; claude chat models will be rejected upstream");
    }

    let client = Arc::new(ProviderClient::new(config).context("failed to build provider client")?);
    let router = create_router(client);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on {addr}");

    axum::serve(listener, router).await?;

    Ok(())
}

/// Initialize tracing/logging.
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("modelmux=info,tower_http=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
