//! room-relay server entry point.
//!
//! Starts the Axum HTTP server with the relay WebSocket and REST endpoints.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use room_relay::api;
use room_relay::app_state::AppState;
use room_relay::config::RelayConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; LOG_FORMAT=json for structured output
    let subscriber = tracing_subscriber::fmt().with_env_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    );
    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    // Load configuration
    let config = RelayConfig::from_env().context("loading configuration")?;
    tracing::info!(
        addr = %config.listen_addr,
        policy = %config.policy,
        static_dir = ?config.static_dir,
        "starting room-relay"
    );

    // Registry starts empty; nothing survives a restart
    let app_state = AppState::new(&config);
    let app = api::build_app(app_state, &config);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
