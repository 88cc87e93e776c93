//! ChatServer Actor implementation
//!
//! The central actor that owns the `ChatHub`. Connection handlers send it
//! commands over an mpsc channel and it applies them one at a time, so hub
//! state never needs a lock.

use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use crate::hub::{ChatHub, HubSnapshot};
use crate::message::OutboundFrame;
use crate::types::ConnectionId;

/// Commands sent from handlers to the ChatServer actor
#[derive(Debug)]
pub enum ServerCommand {
    /// New client connected
    Connect {
        connection_id: ConnectionId,
        sender: mpsc::Sender<OutboundFrame>,
    },
    /// Text or binary frame received
    Frame {
        connection_id: ConnectionId,
        data: Vec<u8>,
        is_binary: bool,
    },
    /// Client closed the connection
    Close {
        connection_id: ConnectionId,
    },
    /// Transport failed for this client
    Error {
        connection_id: ConnectionId,
        reason: String,
    },
    /// Report current hub state
    Snapshot {
        reply: oneshot::Sender<HubSnapshot>,
    },
}

/// The main ChatServer actor
pub struct ChatServer {
    /// All rooms and connections
    hub: ChatHub,
    /// Command receiver channel
    receiver: mpsc::Receiver<ServerCommand>,
}

impl ChatServer {
    /// Create a new ChatServer with the given command receiver
    pub fn new(receiver: mpsc::Receiver<ServerCommand>) -> Self {
        Self {
            hub: ChatHub::new(),
            receiver,
        }
    }

    /// Run the ChatServer event loop
    ///
    /// Continuously receives and processes commands until all senders are dropped.
    pub async fn run(mut self) {
        info!("ChatServer started");

        while let Some(cmd) = self.receiver.recv().await {
            self.handle_command(cmd);
        }

        info!("ChatServer shutting down");
    }

    /// Process a single command
    fn handle_command(&mut self, cmd: ServerCommand) {
        match cmd {
            ServerCommand::Connect {
                connection_id,
                sender,
            } => {
                self.hub.register(connection_id, sender);
            }
            ServerCommand::Frame {
                connection_id,
                data,
                is_binary,
            } => {
                if let Err(e) = self.hub.on_frame(connection_id, &data, is_binary) {
                    warn!("Frame from client {} rejected: {}", connection_id, e);
                }
            }
            ServerCommand::Close { connection_id } => {
                self.hub.on_close(connection_id);
            }
            ServerCommand::Error {
                connection_id,
                reason,
            } => {
                self.hub.on_error(connection_id, &reason);
            }
            ServerCommand::Snapshot { reply } => {
                let _ = reply.send(self.hub.snapshot());
            }
        }
    }
}
