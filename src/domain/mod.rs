//! Domain layer: identifiers, roles, rooms and the room registry.
//!
//! This module contains the relay's server-side model: who is connected,
//! which room and role-slot each connection holds, and the single shared
//! registry that guards all of it.

pub mod connection;
pub mod connection_id;
pub mod role;
pub mod room;
pub mod room_code;
pub mod room_registry;

pub use connection::ConnectionHandle;
pub use connection_id::ConnectionId;
pub use role::Role;
pub use room::{Room, RoomSummary};
pub use room_code::RoomCode;
pub use room_registry::RoomRegistry;
