//! A room: two role-slots and their occupants.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{ConnectionHandle, ConnectionId, Role, RoomCode};

/// One pairing session, keyed by its [`RoomCode`] in the registry.
///
/// Each [`Role`] slot holds at most one connection. A room with no
/// occupants must not be kept in the registry.
#[derive(Debug)]
pub struct Room {
    /// Room code (immutable after creation).
    pub code: RoomCode,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    display: Option<ConnectionHandle>,
    controller: Option<ConnectionHandle>,
}

impl Room {
    /// Creates an empty room.
    #[must_use]
    pub fn new(code: RoomCode) -> Self {
        Self {
            code,
            created_at: Utc::now(),
            display: None,
            controller: None,
        }
    }

    /// Returns the occupant of `role`, if any.
    #[must_use]
    pub const fn slot(&self, role: Role) -> Option<&ConnectionHandle> {
        match role {
            Role::Display => self.display.as_ref(),
            Role::Controller => self.controller.as_ref(),
        }
    }

    fn slot_mut(&mut self, role: Role) -> &mut Option<ConnectionHandle> {
        match role {
            Role::Display => &mut self.display,
            Role::Controller => &mut self.controller,
        }
    }

    /// Puts `handle` into the `role` slot, returning the previous occupant.
    pub fn occupy(&mut self, role: Role, handle: ConnectionHandle) -> Option<ConnectionHandle> {
        self.slot_mut(role).replace(handle)
    }

    /// Empties the `role` slot if it is held by `id`.
    ///
    /// Returns `false` (and leaves the slot alone) when another connection
    /// holds it.
    pub fn vacate(&mut self, role: Role, id: ConnectionId) -> bool {
        let slot = self.slot_mut(role);
        if slot.as_ref().is_some_and(|h| h.id() == id) {
            *slot = None;
            true
        } else {
            false
        }
    }

    /// Returns `true` when both slots are occupied.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.display.is_some() && self.controller.is_some()
    }

    /// Returns `true` when neither slot is occupied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.display.is_none() && self.controller.is_none()
    }

    /// Returns the current occupants, display first.
    #[must_use]
    pub fn occupants(&self) -> Vec<ConnectionHandle> {
        self.display
            .iter()
            .chain(self.controller.iter())
            .cloned()
            .collect()
    }
}

/// Lightweight summary of a room for the introspection endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomSummary {
    /// Room code.
    pub code: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Whether the display slot is occupied.
    pub display: bool,
    /// Whether the controller slot is occupied.
    pub controller: bool,
    /// Whether both slots are occupied.
    pub paired: bool,
}

impl From<&Room> for RoomSummary {
    fn from(room: &Room) -> Self {
        Self {
            code: room.code.to_string(),
            created_at: room.created_at,
            display: room.display.is_some(),
            controller: room.controller.is_some(),
            paired: room.is_complete(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn room() -> Room {
        let Ok(code) = RoomCode::new("R1") else {
            panic!("valid code");
        };
        Room::new(code)
    }

    #[test]
    fn occupy_replaces_previous_occupant() {
        let mut room = room();
        let (first, _rx1) = ConnectionHandle::new(1);
        let (second, _rx2) = ConnectionHandle::new(1);
        assert!(room.occupy(Role::Display, first.clone()).is_none());
        let Some(displaced) = room.occupy(Role::Display, second.clone()) else {
            panic!("first occupant should be displaced");
        };
        assert_eq!(displaced.id(), first.id());
        assert_eq!(room.slot(Role::Display).map(ConnectionHandle::id), Some(second.id()));
    }

    #[test]
    fn vacate_ignores_other_connections() {
        let mut room = room();
        let (occupant, _rx1) = ConnectionHandle::new(1);
        let (stranger, _rx2) = ConnectionHandle::new(1);
        room.occupy(Role::Controller, occupant.clone());
        assert!(!room.vacate(Role::Controller, stranger.id()));
        assert!(room.vacate(Role::Controller, occupant.id()));
        assert!(room.is_empty());
    }

    #[test]
    fn complete_when_both_slots_filled() {
        let mut room = room();
        let (a, _rx1) = ConnectionHandle::new(1);
        let (b, _rx2) = ConnectionHandle::new(1);
        room.occupy(Role::Display, a);
        assert!(!room.is_complete());
        room.occupy(Role::Controller, b);
        assert!(room.is_complete());
        assert_eq!(room.occupants().len(), 2);
    }
}
