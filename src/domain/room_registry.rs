//! Process-wide room membership under a single lock.
//!
//! [`RoomRegistry`] maps room codes to their two role-slots and tracks which
//! `(room, role)` each connection is bound to. Every read and mutation goes
//! through one [`tokio::sync::RwLock`], so concurrent joins and leaves can
//! never put two connections into one slot or drop a room that is still
//! occupied.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::room::{Room, RoomSummary};
use super::{ConnectionHandle, ConnectionId, Role, RoomCode};

/// Room/role a connection is currently registered under.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Binding {
    room: RoomCode,
    role: Role,
}

#[derive(Debug, Default)]
struct RegistryState {
    rooms: HashMap<RoomCode, Room>,
    bindings: HashMap<ConnectionId, Binding>,
    connections: HashMap<ConnectionId, ConnectionHandle>,
}

impl RegistryState {
    fn leave(&mut self, id: ConnectionId) -> LeaveEffect {
        let Some(binding) = self.bindings.remove(&id) else {
            return LeaveEffect::default();
        };

        let mut effect = LeaveEffect {
            room: Some(binding.room.clone()),
            role: Some(binding.role),
            ..LeaveEffect::default()
        };

        if let Some(room) = self.rooms.get_mut(&binding.room)
            && room.vacate(binding.role, id)
        {
            effect.remaining_peers = room.occupants();
            if room.is_empty() {
                self.rooms.remove(&binding.room);
                effect.room_deleted = true;
            }
        }
        effect
    }
}

/// Outcome of [`RoomRegistry::join`].
#[derive(Debug, Clone)]
pub struct JoinResult {
    /// Room that was joined.
    pub room: RoomCode,
    /// Slot the connection now occupies.
    pub role: Role,
    /// Occupants of the room after the join, display first.
    pub occupants: Vec<ConnectionHandle>,
    /// Previous occupant of the slot, now orphaned (its transport stays open).
    pub displaced: Option<ConnectionId>,
    /// Effect of abandoning a different room the connection was bound to.
    pub left: Option<LeaveEffect>,
    /// Whether the opposite role is present after the join.
    pub pairing_complete: bool,
    /// Whether this join turned the room into a new complete pairing.
    ///
    /// `false` when the connection already held this slot, so repeated
    /// joins never re-announce the same pairing.
    pub newly_paired: bool,
}

/// Outcome of [`RoomRegistry::leave`] and [`RoomRegistry::detach`].
#[derive(Debug, Clone, Default)]
pub struct LeaveEffect {
    /// Room the connection was bound to, if any.
    pub room: Option<RoomCode>,
    /// Role the connection held, if any.
    pub role: Option<Role>,
    /// Connections still in the room (zero or one).
    pub remaining_peers: Vec<ConnectionHandle>,
    /// Whether the room was removed because it became empty.
    pub room_deleted: bool,
}

impl LeaveEffect {
    /// Returns `true` if the connection was not bound to any room.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.room.is_none()
    }
}

/// A connection's room, its own role and the occupant of the other slot.
#[derive(Debug, Clone)]
pub struct Counterpart {
    /// Room the connection is bound to.
    pub room: RoomCode,
    /// Role held by the connection.
    pub role: Role,
    /// Occupant of the opposite slot, if present.
    pub peer: Option<ConnectionHandle>,
}

/// Central store for rooms and connection bindings.
///
/// Constructed explicitly and shared behind an `Arc`; there is no global
/// instance, so tests can run any number of independent registries.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    state: RwLock<RegistryState>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a live connection that is not yet bound to a room.
    pub async fn attach(&self, handle: ConnectionHandle) {
        let mut state = self.state.write().await;
        state.connections.insert(handle.id(), handle);
    }

    /// Registers `handle` under `(room_code, role)`.
    ///
    /// Creates the room if it does not exist. A different connection already
    /// in the slot is displaced from the registry without being notified or
    /// closed. If `handle` was bound to another room it leaves that room
    /// first; if it held the other slot of the same room it moves over.
    pub async fn join(
        &self,
        room_code: RoomCode,
        role: Role,
        handle: ConnectionHandle,
    ) -> JoinResult {
        let id = handle.id();
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let mut left = None;
        if let Some(binding) = state.bindings.get(&id).cloned() {
            if binding.room != room_code {
                left = Some(state.leave(id));
            } else if binding.role != role
                && let Some(room) = state.rooms.get_mut(&binding.room)
            {
                room.vacate(binding.role, id);
            }
        }

        let room = state
            .rooms
            .entry(room_code.clone())
            .or_insert_with(|| Room::new(room_code.clone()));

        let already_seated = room.slot(role).is_some_and(|h| h.id() == id);
        let displaced = if already_seated {
            None
        } else {
            room.occupy(role, handle.clone()).map(|prev| prev.id())
        };
        let pairing_complete = room.is_complete();
        let occupants = room.occupants();

        if let Some(displaced_id) = displaced {
            state.bindings.remove(&displaced_id);
        }
        state.bindings.insert(
            id,
            Binding {
                room: room_code.clone(),
                role,
            },
        );
        state.connections.entry(id).or_insert(handle);

        JoinResult {
            room: room_code,
            role,
            occupants,
            displaced,
            left,
            pairing_complete,
            newly_paired: pairing_complete && !already_seated,
        }
    }

    /// Removes the connection from whatever room/role it occupies.
    ///
    /// The connection stays attached. Leaving while unbound returns a
    /// no-op effect.
    pub async fn leave(&self, id: ConnectionId) -> LeaveEffect {
        self.state.write().await.leave(id)
    }

    /// Leaves the connection's room and forgets the connection entirely.
    ///
    /// Calling this twice for the same id is harmless: the second call
    /// returns a no-op effect.
    pub async fn detach(&self, id: ConnectionId) -> LeaveEffect {
        let mut state = self.state.write().await;
        let effect = state.leave(id);
        state.connections.remove(&id);
        effect
    }

    /// Returns the connection's room, role and opposite-slot occupant.
    ///
    /// `None` when the connection is not bound to a room (never joined,
    /// or displaced by a later join).
    pub async fn counterpart(&self, id: ConnectionId) -> Option<Counterpart> {
        let state = self.state.read().await;
        let binding = state.bindings.get(&id)?;
        let peer = state
            .rooms
            .get(&binding.room)
            .and_then(|room| room.slot(binding.role.opposite()))
            .cloned();
        Some(Counterpart {
            room: binding.room.clone(),
            role: binding.role,
            peer,
        })
    }

    /// Returns every attached connection except `id`.
    pub async fn others(&self, id: ConnectionId) -> Vec<ConnectionHandle> {
        let state = self.state.read().await;
        state
            .connections
            .values()
            .filter(|h| h.id() != id)
            .cloned()
            .collect()
    }

    /// Returns a summary of one room.
    pub async fn room_summary(&self, room_code: &RoomCode) -> Option<RoomSummary> {
        let state = self.state.read().await;
        state.rooms.get(room_code).map(RoomSummary::from)
    }

    /// Returns summaries of all rooms, ordered by code.
    pub async fn list_rooms(&self) -> Vec<RoomSummary> {
        let state = self.state.read().await;
        let mut summaries: Vec<RoomSummary> = state.rooms.values().map(RoomSummary::from).collect();
        summaries.sort_by(|a, b| a.code.cmp(&b.code));
        summaries
    }

    /// Returns the number of rooms with at least one occupant.
    pub async fn room_count(&self) -> usize {
        self.state.read().await.rooms.len()
    }

    /// Returns the number of attached connections.
    pub async fn connection_count(&self) -> usize {
        self.state.read().await.connections.len()
    }
}
