//! Error types for the chat server
//!
//! Defines application-level errors and message send errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

use crate::types::ConnectionId;

/// Application-level errors
///
/// Transport errors end the connection. Frame errors are logged by the
/// hub actor and the connection stays open.
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error (fatal)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Frame was not valid JSON or did not match the envelope shape
    #[error("Malformed frame: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send error (fatal - internal channel broken)
    #[error("Channel send error")]
    ChannelSend,

    /// A join or message frame arrived without a string payload
    #[error("Frame of type '{0}' needs a string payload")]
    InvalidPayload(String),

    /// Message frame sent before joining any room
    #[error("Client not in a room")]
    NotInRoom,

    /// Frame addressed to a connection the hub does not know
    #[error("Unknown connection: {0}")]
    UnknownConnection(ConnectionId),
}

/// Message send errors
///
/// Occurs when attempting to hand a frame to a connection's writer.
#[derive(Debug, Error)]
pub enum SendError {
    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,

    /// The connection's outbound buffer is full
    #[error("Channel full")]
    ChannelFull,
}
