//! Session supervisor: join notifications and the close path.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::domain::room_registry::{JoinResult, LeaveEffect};
use crate::domain::{ConnectionHandle, ConnectionId, RoomRegistry};
use crate::ws::messages::{JoinRequest, ServerMessage};

/// Orchestrates the lifecycle of connections inside rooms.
///
/// Owns a reference to the [`RoomRegistry`] and turns its results into
/// notifications: `connected` for the joiner, `both_connected` when a room
/// becomes paired, and `peer_disconnected` when an occupant goes away.
/// Every notification is best-effort; a failed send is logged and dropped.
#[derive(Debug, Clone)]
pub struct SessionSupervisor {
    registry: Arc<RoomRegistry>,
    outbound_capacity: usize,
}

impl SessionSupervisor {
    /// Creates a new `SessionSupervisor`.
    #[must_use]
    pub fn new(registry: Arc<RoomRegistry>, outbound_capacity: usize) -> Self {
        Self {
            registry,
            outbound_capacity,
        }
    }

    /// Returns a reference to the inner [`RoomRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Creates and attaches a handle for a freshly established transport.
    ///
    /// The returned receiver yields the frames to write to the socket.
    pub async fn connect(&self) -> (ConnectionHandle, mpsc::Receiver<String>) {
        let (handle, rx) = ConnectionHandle::new(self.outbound_capacity);
        self.registry.attach(handle.clone()).await;
        tracing::debug!(connection_id = %handle.id(), "connection attached");
        (handle, rx)
    }

    /// Joins `handle` to the requested room and sends the resulting
    /// notifications.
    pub async fn join(&self, handle: &ConnectionHandle, request: JoinRequest) -> JoinResult {
        let JoinRequest {
            room,
            role,
            client_type,
        } = request;
        let result = self.registry.join(room.clone(), role, handle.clone()).await;

        if let Some(left) = &result.left {
            self.notify_left(left);
        }
        if let Some(displaced) = result.displaced {
            tracing::warn!(
                %room,
                %role,
                connection_id = %handle.id(),
                displaced_id = %displaced,
                "slot taken over; previous occupant orphaned"
            );
        }
        tracing::info!(%room, %role, connection_id = %handle.id(), "joined room");

        deliver(
            handle,
            &ServerMessage::Connected {
                room: room.clone(),
                client_type,
            },
        );

        if result.newly_paired {
            tracing::info!(%room, "room paired");
            let paired = ServerMessage::BothConnected { room };
            for occupant in &result.occupants {
                deliver(occupant, &paired);
            }
        }
        result
    }

    /// Runs the close path for a connection.
    ///
    /// Removes it from the registry and sends one `peer_disconnected` to
    /// the remaining occupant, if any. Safe to call more than once: later
    /// calls find nothing to remove and notify nobody.
    pub async fn disconnect(&self, id: ConnectionId) -> LeaveEffect {
        let effect = self.registry.detach(id).await;
        if let Some(room) = &effect.room {
            tracing::info!(
                %room,
                connection_id = %id,
                room_deleted = effect.room_deleted,
                "left room"
            );
        }
        self.notify_left(&effect);
        effect
    }

    fn notify_left(&self, effect: &LeaveEffect) {
        let Some(room) = &effect.room else {
            return;
        };
        let message = ServerMessage::PeerDisconnected { room: room.clone() };
        for peer in &effect.remaining_peers {
            deliver(peer, &message);
        }
    }
}

/// Best-effort send of a relay notification.
fn deliver(handle: &ConnectionHandle, message: &ServerMessage) {
    let result = message.to_frame().and_then(|frame| handle.send(frame));
    if let Err(e) = result {
        tracing::warn!(connection_id = %handle.id(), error = %e, "notification dropped");
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Role, RoomCode};

    fn request(room: &str, role: Role) -> JoinRequest {
        let Ok(room) = RoomCode::new(room) else {
            panic!("valid room code");
        };
        JoinRequest {
            room,
            role,
            client_type: role.as_str().to_string(),
        }
    }

    fn drain(rx: &mut mpsc::Receiver<String>) -> Vec<String> {
        let mut frames = Vec::new();
        while let Ok(frame) = rx.try_recv() {
            frames.push(frame);
        }
        frames
    }

    fn supervisor() -> SessionSupervisor {
        SessionSupervisor::new(Arc::new(RoomRegistry::new()), 16)
    }

    #[tokio::test]
    async fn join_acknowledges_sender_only() {
        let sup = supervisor();
        let (display, mut display_rx) = sup.connect().await;
        sup.join(&display, request("R1", Role::Display)).await;

        assert_eq!(
            drain(&mut display_rx),
            vec![r#"{"type":"connected","room":"R1","client_type":"display"}"#.to_string()]
        );
    }

    #[tokio::test]
    async fn pairing_notifies_both_once() {
        let sup = supervisor();
        let (display, mut display_rx) = sup.connect().await;
        let (controller, mut controller_rx) = sup.connect().await;
        sup.join(&display, request("R1", Role::Display)).await;
        drain(&mut display_rx);

        sup.join(&controller, request("R1", Role::Controller)).await;
        let both = r#"{"type":"both_connected","room":"R1"}"#.to_string();
        assert_eq!(drain(&mut display_rx), vec![both.clone()]);
        let controller_frames = drain(&mut controller_rx);
        assert_eq!(controller_frames.len(), 2);
        assert!(controller_frames.first().is_some_and(|f| f.contains("\"connected\"")));
        assert_eq!(controller_frames.get(1), Some(&both));

        sup.join(&controller, request("R1", Role::Controller)).await;
        assert!(drain(&mut display_rx).is_empty());
        assert_eq!(drain(&mut controller_rx).len(), 1);
    }

    #[tokio::test]
    async fn disconnect_notifies_remaining_peer_once() {
        let sup = supervisor();
        let (display, mut display_rx) = sup.connect().await;
        let (controller, _controller_rx) = sup.connect().await;
        sup.join(&display, request("R1", Role::Display)).await;
        sup.join(&controller, request("R1", Role::Controller)).await;
        drain(&mut display_rx);

        sup.disconnect(controller.id()).await;
        sup.disconnect(controller.id()).await;
        assert_eq!(
            drain(&mut display_rx),
            vec![r#"{"type":"peer_disconnected","room":"R1"}"#.to_string()]
        );
        assert_eq!(sup.registry().connection_count().await, 1);
    }

    #[tokio::test]
    async fn last_disconnect_removes_room() {
        let sup = supervisor();
        let (display, _rx) = sup.connect().await;
        sup.join(&display, request("R1", Role::Display)).await;

        let effect = sup.disconnect(display.id()).await;
        assert!(effect.room_deleted);
        assert_eq!(sup.registry().room_count().await, 0);
    }

    #[tokio::test]
    async fn displaced_occupant_is_not_notified() {
        let sup = supervisor();
        let (first, mut first_rx) = sup.connect().await;
        let (second, _second_rx) = sup.connect().await;
        sup.join(&first, request("R1", Role::Controller)).await;
        drain(&mut first_rx);

        let result = sup.join(&second, request("R1", Role::Controller)).await;
        assert_eq!(result.displaced, Some(first.id()));
        assert!(drain(&mut first_rx).is_empty());
        assert!(!first.is_closed());
    }

    #[tokio::test]
    async fn rejoining_elsewhere_tells_former_peer() {
        let sup = supervisor();
        let (display, mut display_rx) = sup.connect().await;
        let (controller, _controller_rx) = sup.connect().await;
        sup.join(&display, request("R1", Role::Display)).await;
        sup.join(&controller, request("R1", Role::Controller)).await;
        drain(&mut display_rx);

        sup.join(&controller, request("R2", Role::Controller)).await;
        assert_eq!(
            drain(&mut display_rx),
            vec![r#"{"type":"peer_disconnected","room":"R1"}"#.to_string()]
        );
    }

    #[tokio::test]
    async fn closed_peer_does_not_break_disconnect() {
        let sup = supervisor();
        let (display, display_rx) = sup.connect().await;
        let (controller, _controller_rx) = sup.connect().await;
        sup.join(&display, request("R1", Role::Display)).await;
        sup.join(&controller, request("R1", Role::Controller)).await;
        drop(display_rx);

        let effect = sup.disconnect(controller.id()).await;
        assert_eq!(effect.remaining_peers.len(), 1);
    }
}
