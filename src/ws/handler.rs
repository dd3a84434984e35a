//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /ws` — Upgrade HTTP connection to a relay WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let router = std::sync::Arc::clone(&state.router);
    let idle_timeout = state.idle_timeout;

    ws.on_upgrade(move |socket| run_connection(socket, router, idle_timeout))
}
