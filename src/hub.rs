//! ChatHub: room table plus connection registry
//!
//! One hub holds all chat state for a server instance. It is owned by the
//! `ChatServer` actor, which feeds it events one at a time, so every
//! multi-step mutation here runs without interleaving.
//!
//! Frame routing, broadcast and close handling live in `router`,
//! `broadcast` and `lifecycle` as further `impl ChatHub` blocks.

use std::collections::{HashMap, HashSet};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::connection::Connection;
use crate::message::OutboundFrame;
use crate::registry::ConnectionRegistry;
use crate::room::RoomTable;
use crate::types::{ConnectionId, RoomId};

/// Point-in-time view of hub state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HubSnapshot {
    /// Number of registered connections
    pub connections: usize,
    /// Member count per live room
    pub rooms: HashMap<RoomId, usize>,
}

/// All rooms and connections of one server instance
#[derive(Debug, Default)]
pub struct ChatHub {
    pub(crate) registry: ConnectionRegistry,
    pub(crate) rooms: RoomTable,
}

impl ChatHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly connected client with no room
    pub fn register(&mut self, id: ConnectionId, sender: mpsc::Sender<OutboundFrame>) {
        info!("Client {} connected", id);
        self.registry.insert(Connection::new(id, sender));
        self.log_totals();
    }

    /// Leave the current room and forget the connection
    ///
    /// Returns false if the connection was not registered.
    pub fn unregister(&mut self, id: ConnectionId) -> bool {
        if !self.registry.contains(id) {
            debug!("Client {} already unregistered", id);
            return false;
        }

        self.leave(id);
        if let Some(connection) = self.registry.remove(id) {
            info!(
                "Client {} disconnected after {:?}",
                id,
                connection.connected_for()
            );
        }
        self.log_totals();
        true
    }

    /// Put a connection into a room, leaving its previous room first
    ///
    /// Joining the room the connection is already in changes nothing.
    pub fn join(&mut self, id: ConnectionId, room_id: RoomId) {
        if !self.registry.contains(id) {
            warn!("Join from unregistered client {} ignored", id);
            return;
        }

        if self.registry.current_room(id) == Some(&room_id) {
            debug!("Client {} already in room {}", id, room_id);
            return;
        }

        self.leave(id);

        self.registry.set_room(id, room_id.clone());
        self.rooms.add_member(&room_id, id);

        info!("Client {} joined room {}", id, room_id);
    }

    /// Take a connection out of its room, deleting the room if now empty
    pub fn leave(&mut self, id: ConnectionId) {
        let Some(room_id) = self.registry.clear_room(id) else {
            return;
        };

        self.rooms.remove_member(&room_id, id);
        info!("Client {} left room {}", id, room_id);
    }

    pub fn current_room(&self, id: ConnectionId) -> Option<&RoomId> {
        self.registry.current_room(id)
    }

    pub fn is_registered(&self, id: ConnectionId) -> bool {
        self.registry.contains(id)
    }

    pub fn has_room(&self, room_id: &RoomId) -> bool {
        self.rooms.contains(room_id)
    }

    /// Members of a room, None if the room does not exist
    pub fn room_members(&self, room_id: &RoomId) -> Option<HashSet<ConnectionId>> {
        self.rooms.members(room_id)
    }

    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn snapshot(&self) -> HubSnapshot {
        HubSnapshot {
            connections: self.registry.len(),
            rooms: self
                .rooms
                .iter()
                .map(|room| (room.id.clone(), room.member_count()))
                .collect(),
        }
    }

    fn log_totals(&self) {
        debug!(
            "Total clients: {}, Total rooms: {}",
            self.registry.len(),
            self.rooms.len()
        );
    }

    /// Check the room table against the registry side-table
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        for room in self.rooms.iter() {
            assert!(!room.is_empty(), "empty room {} in table", room.id);
            for member in room.members() {
                assert!(self.registry.contains(member));
                assert_eq!(self.registry.current_room(member), Some(&room.id));
            }
        }

        for (id, room_id) in self.registry.memberships() {
            let room = self.rooms.get(room_id);
            assert!(
                room.is_some_and(|room| room.contains(id)),
                "client {} not a member of its room {}",
                id,
                room_id
            );
        }
    }
}
