//! WebSocket layer: upgrade handler, connection loop, wire messages.
//!
//! The endpoint at `/ws` carries the relay protocol: clients join a room
//! under a role and exchange JSON frames with the other occupant.

pub mod connection;
pub mod handler;
pub mod messages;
