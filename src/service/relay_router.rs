//! Relay router: classifies inbound frames and picks their recipients.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

use super::SessionSupervisor;
use crate::domain::{ConnectionHandle, Role};
use crate::error::RelayError;
use crate::ws::messages::ClientMessage;

/// Where non-join frames are forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ForwardingPolicy {
    /// Forward to the opposite role in the sender's room only.
    #[default]
    RoomScoped,
    /// Forward to every other connection in the process.
    Broadcast,
}

impl fmt::Display for ForwardingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoomScoped => f.write_str("room_scoped"),
            Self::Broadcast => f.write_str("broadcast"),
        }
    }
}

impl FromStr for ForwardingPolicy {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "room" | "room_scoped" => Ok(Self::RoomScoped),
            "broadcast" => Ok(Self::Broadcast),
            other => Err(RelayError::Config(format!("unknown relay policy: {other}"))),
        }
    }
}

/// Why a well-formed frame was not forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// The sender has not joined a room (or was displaced).
    Unbound,
    /// The sender's role may not send this message type.
    WrongRole,
    /// The target slot is empty.
    NoPeer,
    /// The message type is not relayed under this policy.
    UnknownType,
}

/// What the router did with one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// A join was processed.
    Joined,
    /// The frame was queued to this many connections.
    Forwarded(usize),
    /// The frame was dropped.
    Dropped(DropReason),
}

/// Dispatches inbound frames according to a [`ForwardingPolicy`].
#[derive(Debug, Clone)]
pub struct RelayRouter {
    supervisor: Arc<SessionSupervisor>,
    policy: ForwardingPolicy,
}

impl RelayRouter {
    /// Creates a router over the given supervisor.
    #[must_use]
    pub fn new(supervisor: Arc<SessionSupervisor>, policy: ForwardingPolicy) -> Self {
        Self { supervisor, policy }
    }

    /// Returns the active forwarding policy.
    #[must_use]
    pub const fn policy(&self) -> ForwardingPolicy {
        self.policy
    }

    /// Returns the supervisor this router notifies through.
    #[must_use]
    pub fn supervisor(&self) -> &Arc<SessionSupervisor> {
        &self.supervisor
    }

    /// Routes one text frame received from `sender`.
    ///
    /// Relayed frames are forwarded as the original text. Under
    /// [`ForwardingPolicy::Broadcast`] a join is processed and then relayed
    /// like any other frame. Failing to queue a frame for a peer is logged
    /// and never reported to the sender.
    ///
    /// # Errors
    ///
    /// Returns a [`RelayError`] if the frame is malformed or an invalid
    /// join. The caller drops the frame and keeps the connection open.
    pub async fn route(
        &self,
        sender: &ConnectionHandle,
        text: &str,
    ) -> Result<RouteOutcome, RelayError> {
        let message = ClientMessage::parse(text)?;

        if let ClientMessage::Join(request) = message {
            self.supervisor.join(sender, request).await;
            if self.policy == ForwardingPolicy::Broadcast {
                self.broadcast(sender, text).await;
            }
            return Ok(RouteOutcome::Joined);
        }

        match self.policy {
            ForwardingPolicy::Broadcast => Ok(self.broadcast(sender, text).await),
            ForwardingPolicy::RoomScoped => match message {
                ClientMessage::Control => {
                    Ok(self.forward_to_peer(sender, Role::Controller, text).await)
                }
                ClientMessage::GameState => {
                    Ok(self.forward_to_peer(sender, Role::Display, text).await)
                }
                other => {
                    tracing::debug!(
                        connection_id = %sender.id(),
                        kind = other.kind(),
                        "unrelayed message type dropped"
                    );
                    Ok(RouteOutcome::Dropped(DropReason::UnknownType))
                }
            },
        }
    }

    /// Forwards `text` to the opposite slot if `sender` holds `required`.
    async fn forward_to_peer(
        &self,
        sender: &ConnectionHandle,
        required: Role,
        text: &str,
    ) -> RouteOutcome {
        let Some(counterpart) = self.supervisor.registry().counterpart(sender.id()).await else {
            return RouteOutcome::Dropped(DropReason::Unbound);
        };
        if counterpart.role != required {
            return RouteOutcome::Dropped(DropReason::WrongRole);
        }
        let Some(peer) = counterpart.peer else {
            return RouteOutcome::Dropped(DropReason::NoPeer);
        };
        if let Err(e) = peer.send(text) {
            tracing::warn!(
                room = %counterpart.room,
                peer_id = %peer.id(),
                error = %e,
                "relay send dropped"
            );
        }
        RouteOutcome::Forwarded(1)
    }

    async fn broadcast(&self, sender: &ConnectionHandle, text: &str) -> RouteOutcome {
        let others = self.supervisor.registry().others(sender.id()).await;
        for peer in &others {
            if let Err(e) = peer.send(text) {
                tracing::warn!(peer_id = %peer.id(), error = %e, "broadcast send dropped");
            }
        }
        RouteOutcome::Forwarded(others.len())
    }
}
