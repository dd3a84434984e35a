//! Response bodies for the room and statistics endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::RoomSummary;
use crate::service::ForwardingPolicy;

/// Response body for `GET /api/v1/rooms`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomListResponse {
    /// Rooms currently holding at least one connection, ordered by code.
    pub rooms: Vec<RoomSummary>,
    /// Number of rooms listed.
    pub total: usize,
}

/// Response body for `GET /stats`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Rooms currently held in the registry.
    pub rooms: usize,
    /// Open WebSocket connections, joined or not.
    pub connections: usize,
    /// Active forwarding policy.
    pub policy: ForwardingPolicy,
}
