//! Wire protocol: inbound client frames and outbound server notifications.
//!
//! Every frame is a JSON object with a mandatory `type` field. Only `join`
//! is interpreted beyond its type; relayed frames are forwarded as the
//! original text.

use serde::{Deserialize, Serialize};

use crate::domain::{Role, RoomCode};
use crate::error::RelayError;

/// Classified inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Register the connection in a room under a role.
    Join(JoinRequest),
    /// Input event from a controller, relayed to the display.
    Control,
    /// State update from a display, relayed to the controller.
    GameState,
    /// Any other well-formed type, carried for forward compatibility.
    Other(String),
}

/// Parsed `join` frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    /// Room to join.
    pub room: RoomCode,
    /// Slot to occupy.
    pub role: Role,
    /// Label the client used for its role, echoed in the acknowledgement.
    pub client_type: String,
}

#[derive(Deserialize)]
struct RawJoin {
    room: RoomCode,
    client_type: String,
}

impl ClientMessage {
    /// Classifies a text frame by its `type` field.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::MalformedFrame`] for invalid JSON,
    /// [`RelayError::MissingType`] when `type` is absent or not a string,
    /// and [`RelayError::InvalidJoin`] for a `join` with an empty room or an
    /// unknown client type.
    pub fn parse(text: &str) -> Result<Self, RelayError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let kind = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or(RelayError::MissingType)?;

        match kind {
            "join" => {
                let raw: RawJoin = serde_json::from_value(value)
                    .map_err(|e| RelayError::InvalidJoin(e.to_string()))?;
                let role = raw.client_type.parse()?;
                Ok(Self::Join(JoinRequest {
                    room: raw.room,
                    role,
                    client_type: raw.client_type,
                }))
            }
            "control" => Ok(Self::Control),
            "game_state" => Ok(Self::GameState),
            other => Ok(Self::Other(other.to_string())),
        }
    }

    /// Returns the wire `type` of the frame.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Join(_) => "join",
            Self::Control => "control",
            Self::GameState => "game_state",
            Self::Other(kind) => kind,
        }
    }
}

/// Notifications generated by the relay itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Acknowledges the sender's own join.
    Connected {
        /// Joined room.
        room: RoomCode,
        /// Role label as sent by the client.
        client_type: String,
    },
    /// Both slots of the room are now occupied.
    BothConnected {
        /// Paired room.
        room: RoomCode,
    },
    /// The other occupant left or its connection closed.
    PeerDisconnected {
        /// Room the peer left.
        room: RoomCode,
    },
}

impl ServerMessage {
    /// Serializes the notification into a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::MalformedFrame`] if serialization fails.
    pub fn to_frame(&self) -> Result<String, RelayError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn join_with_projection_alias() {
        let frame = r#"{"type":"join","room":"ROOM0042","client_type":"projection"}"#;
        let Ok(ClientMessage::Join(req)) = ClientMessage::parse(frame) else {
            panic!("join should parse");
        };
        assert_eq!(req.room.as_str(), "ROOM0042");
        assert_eq!(req.role, Role::Display);
        assert_eq!(req.client_type, "projection");
    }

    #[test]
    fn join_with_empty_room_is_invalid() {
        let frame = r#"{"type":"join","room":"","client_type":"display"}"#;
        assert!(matches!(ClientMessage::parse(frame), Err(RelayError::InvalidJoin(_))));
    }

    #[test]
    fn join_without_client_type_is_invalid() {
        let frame = r#"{"type":"join","room":"R1"}"#;
        assert!(matches!(ClientMessage::parse(frame), Err(RelayError::InvalidJoin(_))));
    }

    #[test]
    fn missing_or_non_string_type() {
        assert!(matches!(
            ClientMessage::parse(r#"{"action":"jump"}"#),
            Err(RelayError::MissingType)
        ));
        assert!(matches!(ClientMessage::parse(r#"{"type":7}"#), Err(RelayError::MissingType)));
        assert!(matches!(ClientMessage::parse("[1,2]"), Err(RelayError::MissingType)));
    }

    #[test]
    fn invalid_json_is_malformed() {
        assert!(matches!(ClientMessage::parse("jump!"), Err(RelayError::MalformedFrame(_))));
    }

    #[test]
    fn relay_kinds_are_classified() {
        let control = r#"{"type":"control","action":"jump","timestamp":1700000000}"#;
        assert_eq!(ClientMessage::parse(control).ok(), Some(ClientMessage::Control));
        assert_eq!(
            ClientMessage::parse(r#"{"type":"game_state","score":3}"#).ok(),
            Some(ClientMessage::GameState)
        );
        let Ok(other) = ClientMessage::parse(r#"{"type":"chat"}"#) else {
            panic!("unknown types still parse");
        };
        assert_eq!(other.kind(), "chat");
    }

    #[test]
    fn server_messages_are_tagged() {
        let Ok(room) = RoomCode::new("R1") else {
            panic!("valid code");
        };
        let Ok(frame) = ServerMessage::Connected {
            room: room.clone(),
            client_type: "display".to_string(),
        }
        .to_frame() else {
            panic!("serializable");
        };
        assert_eq!(frame, r#"{"type":"connected","room":"R1","client_type":"display"}"#);

        let Ok(frame) = ServerMessage::PeerDisconnected { room }.to_frame() else {
            panic!("serializable");
        };
        assert_eq!(frame, r#"{"type":"peer_disconnected","room":"R1"}"#);
    }
}
