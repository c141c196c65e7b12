use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use docchat_api::config::ServerConfig;
use docchat_api::routes::router;
use docchat_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::parse();
    let addr: SocketAddr = config
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {}", config.bind))?;
    let state = AppState::from_config(&config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "docchat-api listening");
    axum::serve(listener, router(state))
        .await
        .context("server shutdown")?;
    Ok(())
}
