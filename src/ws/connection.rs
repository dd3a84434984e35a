//! WebSocket connection loop.
//!
//! Handles the read/write loop for a single WebSocket connection: inbound
//! frames go through the [`RelayRouter`], queued outbound frames go to the
//! socket. When the loop ends for any reason the session supervisor's close
//! path runs exactly once.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::time::Instant;

use crate::service::RelayRouter;

/// Fallback sleep length when no idle timeout is configured; the branch is
/// disabled in that case and this value is never observed.
const IDLE_DISABLED: Duration = Duration::from_secs(3600);

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads frames from the client and hands them to the router.
/// - Writes frames queued for this connection by other connections.
/// - Closes the connection after `idle_timeout` without inbound traffic.
pub async fn run_connection(
    socket: WebSocket,
    router: Arc<RelayRouter>,
    idle_timeout: Option<Duration>,
) {
    let supervisor = Arc::clone(router.supervisor());
    let (handle, mut outbound_rx) = supervisor.connect().await;
    let connection_id = handle.id();
    let (mut ws_tx, mut ws_rx) = socket.split();

    let idle = tokio::time::sleep(idle_timeout.unwrap_or(IDLE_DISABLED));
    tokio::pin!(idle);

    loop {
        tokio::select! {
            // Incoming frame from client
            msg = ws_rx.next() => {
                let deadline = idle_timeout.and_then(|limit| Instant::now().checked_add(limit));
                if let Some(deadline) = deadline {
                    idle.as_mut().reset(deadline);
                }
                let text = match msg {
                    Some(Ok(Message::Text(text))) => text.as_str().to_owned(),
                    Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                        Ok(text) => text.to_owned(),
                        Err(e) => {
                            tracing::debug!(%connection_id, error = %e, "non-utf8 frame dropped");
                            continue;
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        tracing::debug!(%connection_id, error = %e, "ws read failed");
                        break;
                    }
                };
                match router.route(&handle, &text).await {
                    Ok(outcome) => tracing::trace!(%connection_id, ?outcome, "frame routed"),
                    Err(e) => tracing::debug!(%connection_id, error = %e, "frame dropped"),
                }
            }
            // Frame queued for this client
            frame = outbound_rx.recv() => {
                let Some(frame) = frame else { break };
                if let Err(e) = ws_tx.send(Message::text(frame)).await {
                    tracing::debug!(%connection_id, error = %e, "ws write failed");
                    break;
                }
            }
            () = &mut idle, if idle_timeout.is_some() => {
                tracing::info!(%connection_id, "closing idle connection");
                break;
            }
        }
    }

    supervisor.disconnect(connection_id).await;
    if let Err(e) = ws_tx.close().await {
        tracing::trace!(%connection_id, error = %e, "ws close after shutdown");
    }
    tracing::debug!(%connection_id, "ws connection closed");
}
