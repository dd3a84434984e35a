//! # room-relay
//!
//! Room-based WebSocket relay that pairs a display client with a controller
//! client under a short room code and forwards their JSON frames.
//!
//! Clients join with `{"type":"join","room":..,"client_type":..}`. Once both
//! role-slots of a room are filled, each occupant receives
//! `both_connected`; `control` frames then flow from controller to display
//! and `game_state` frames from display to controller. When one side goes
//! away the other receives `peer_disconnected`.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS Handler + connection loop (ws/)
//!     ├── REST introspection (api/)
//!     │
//!     ├── RelayRouter (service/)
//!     ├── SessionSupervisor (service/)
//!     │
//!     └── RoomRegistry (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
