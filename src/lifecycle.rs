//! Connection lifecycle
//!
//! Close and transport-error handling. Both tear the connection down the
//! same way and neither can fail; after either one the connection is
//! `Closed` for good.

use std::fmt;

use tracing::{info, warn};

use crate::hub::ChatHub;
use crate::types::ConnectionId;

/// Where a connection is in its lifetime
///
/// `Connected -> InRoom -> Connected -> ... -> Closed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Registered, not in any room
    Connected,
    /// Registered and a member of a room
    InRoom,
    /// Unregistered; terminal
    Closed,
}

impl ChatHub {
    /// Transport reported an orderly close
    pub fn on_close(&mut self, id: ConnectionId) {
        info!("Client {} closed connection", id);
        self.unregister(id);
    }

    /// Transport reported an error; the connection is torn down
    pub fn on_error(&mut self, id: ConnectionId, error: &dyn fmt::Display) {
        warn!("Transport error for client {}: {}", id, error);
        self.unregister(id);
    }

    pub fn state(&self, id: ConnectionId) -> ConnectionState {
        if !self.is_registered(id) {
            ConnectionState::Closed
        } else if self.current_room(id).is_some() {
            ConnectionState::InRoom
        } else {
            ConnectionState::Connected
        }
    }
}
