//! Room-based WebSocket Chat Server Library
//!
//! A WebSocket chat server built with tokio-tungstenite where clients join
//! named rooms and every message is relayed to the other members of the
//! sender's room.
//!
//! # Protocol
//! - `{"type":"join","payload":"<room>"}` joins a room, leaving any previous one
//! - `{"type":"message","payload":"<text>"}` is relayed to the rest of the room
//!   as `{"type":"message","payload":"<text>"}`, with the same text/binary framing
//!
//! # Architecture
//! Uses the Actor pattern with `mpsc` channels:
//! - `ChatServer` is the central actor owning a `ChatHub` (room table and
//!   connection registry)
//! - Each connection has a `handler` task communicating with the server
//! - No locks needed - all state access goes through message passing
//!
//! # Example
//! ```ignore
//! use tokio::net::TcpListener;
//! use tokio::sync::mpsc;
//! use room_chat::{serve, ChatServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::default();
//!     let listener = TcpListener::bind(&config.addr).await.unwrap();
//!     let (cmd_tx, cmd_rx) = mpsc::channel(config.command_buffer);
//!
//!     tokio::spawn(ChatServer::new(cmd_rx).run());
//!     serve(listener, cmd_tx, config.outbound_buffer).await;
//! }
//! ```

pub mod broadcast;
pub mod config;
pub mod connection;
pub mod error;
pub mod handler;
pub mod hub;
pub mod lifecycle;
pub mod message;
pub mod registry;
pub mod room;
pub mod router;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use config::ServerConfig;
pub use connection::Connection;
pub use error::{AppError, SendError};
pub use handler::{handle_connection, serve};
pub use hub::{ChatHub, HubSnapshot};
pub use lifecycle::ConnectionState;
pub use message::{ClientMessage, OutboundFrame, ServerMessage};
pub use registry::ConnectionRegistry;
pub use room::{Room, RoomTable};
pub use server::{ChatServer, ServerCommand};
pub use types::{ConnectionId, RoomId};
