//! Room and room table definitions
//!
//! A room is a named broadcast group with any number of members. The table
//! creates rooms on first join and deletes them as soon as they are empty,
//! so an empty room is never observable.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::types::{ConnectionId, RoomId};

/// Chat room
#[derive(Debug)]
pub struct Room {
    /// Room identifier
    pub id: RoomId,
    /// Member connections (membership, not ownership)
    members: HashSet<ConnectionId>,
    /// Room creation time
    pub created_at: Instant,
}

impl Room {
    /// Create a new room with no members
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            members: HashSet::new(),
            created_at: Instant::now(),
        }
    }

    /// Add a member; returns false if it was already present
    pub fn add_member(&mut self, id: ConnectionId) -> bool {
        self.members.insert(id)
    }

    /// Remove a member
    ///
    /// Returns true if the room should be deleted (no members left).
    pub fn remove_member(&mut self, id: ConnectionId) -> bool {
        self.members.remove(&id);
        self.members.is_empty()
    }

    /// Check if a connection is in this room
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.members.contains(&id)
    }

    pub fn members(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.members.iter().copied()
    }

    /// Time since the room was created
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// RoomId -> Room, never holding an empty room
#[derive(Debug, Default)]
pub struct RoomTable {
    rooms: HashMap<RoomId, Room>,
}

impl RoomTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to a room, creating the room if absent
    pub fn add_member(&mut self, room_id: &RoomId, id: ConnectionId) {
        let room = self.rooms.entry(room_id.clone()).or_insert_with(|| {
            debug!("Room {} created", room_id);
            Room::new(room_id.clone())
        });
        room.add_member(id);
    }

    /// Remove a connection from a room, deleting the room if now empty
    ///
    /// Returns true if the room was deleted.
    pub fn remove_member(&mut self, room_id: &RoomId, id: ConnectionId) -> bool {
        let Some(room) = self.rooms.get_mut(room_id) else {
            return false;
        };

        if !room.remove_member(id) {
            return false;
        }

        if let Some(room) = self.rooms.remove(room_id) {
            debug!("Room {} deleted (empty) after {:?}", room_id, room.age());
        }
        true
    }

    pub fn get(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Snapshot of a room's members, None if the room does not exist
    pub fn members(&self, room_id: &RoomId) -> Option<HashSet<ConnectionId>> {
        self.rooms.get(room_id).map(|room| room.members().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// Number of live rooms
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
