//! Connection registry
//!
//! Live connections plus a side-table of which room each one is in.

use std::collections::HashMap;

use crate::connection::Connection;
use crate::types::{ConnectionId, RoomId};

/// All live connections and their current room
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    /// ConnectionId -> Connection
    connections: HashMap<ConnectionId, Connection>,
    /// ConnectionId -> RoomId, only for connections that are in a room
    memberships: HashMap<ConnectionId, RoomId>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection with no room assignment
    ///
    /// Replacing an existing id swaps the channel; room membership is kept.
    pub fn insert(&mut self, connection: Connection) {
        self.connections.insert(connection.id, connection);
    }

    /// Remove a connection and its room assignment
    ///
    /// Callers must leave the room first so the room table stays in sync.
    pub fn remove(&mut self, id: ConnectionId) -> Option<Connection> {
        self.memberships.remove(&id);
        self.connections.remove(&id)
    }

    pub fn get(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.contains_key(&id)
    }

    pub fn current_room(&self, id: ConnectionId) -> Option<&RoomId> {
        self.memberships.get(&id)
    }

    /// Record the connection's room, returning the previous one
    pub fn set_room(&mut self, id: ConnectionId, room_id: RoomId) -> Option<RoomId> {
        self.memberships.insert(id, room_id)
    }

    /// Clear the connection's room, returning it
    pub fn clear_room(&mut self, id: ConnectionId) -> Option<RoomId> {
        self.memberships.remove(&id)
    }

    /// Every (connection, room) assignment
    pub fn memberships(&self) -> impl Iterator<Item = (ConnectionId, &RoomId)> {
        self.memberships.iter().map(|(id, room_id)| (*id, room_id))
    }

    /// Number of live connections
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
