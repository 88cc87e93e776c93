//! Connection handle
//!
//! The hub's view of one connected client: its id and the channel feeding
//! that client's writer task.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::error::SendError;
use crate::message::OutboundFrame;
use crate::types::ConnectionId;

/// Connected client handle
#[derive(Debug)]
pub struct Connection {
    /// Unique identifier for this connection
    pub id: ConnectionId,
    /// Hub → writer task channel
    pub sender: mpsc::Sender<OutboundFrame>,
    /// Registration time
    pub connected_at: Instant,
}

impl Connection {
    /// Create a new connection with the given ID and sender channel
    pub fn new(id: ConnectionId, sender: mpsc::Sender<OutboundFrame>) -> Self {
        Self {
            id,
            sender,
            connected_at: Instant::now(),
        }
    }

    /// How long this connection has been registered
    pub fn connected_for(&self) -> Duration {
        self.connected_at.elapsed()
    }

    /// Whether the writer task is still draining this channel
    ///
    /// Readiness means the writer task is alive, not that the socket is: a
    /// peer that already dropped still counts as open until its close event
    /// reaches the hub, so a queued frame is not a confirmed delivery.
    pub fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Queue a frame without waiting for the writer
    pub fn try_send(&self, frame: OutboundFrame) -> Result<(), SendError> {
        self.sender.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => SendError::ChannelFull,
            TrySendError::Closed(_) => SendError::ChannelClosed,
        })
    }
}
