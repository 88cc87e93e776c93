//! Message protocol definitions
//!
//! JSON envelopes of the form `{"type": ..., "payload": ...}` in both
//! directions. Inbound frames are decoded in two steps so that an unknown
//! `type` can be told apart from a malformed frame.

use serde::{Deserialize, Serialize};
use tokio_tungstenite::tungstenite::Message;

use crate::error::AppError;
use crate::types::RoomId;

/// Raw inbound envelope before the `type` tag is interpreted
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Option<serde_json::Value>,
}

/// Client → Server message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// Join (or switch to) a room
    Join { room_id: RoomId },
    /// Send a chat message to the current room
    Message { payload: String },
    /// Any other `type` value; logged and ignored
    Unknown { kind: String },
}

impl ClientMessage {
    /// Decode one inbound frame
    ///
    /// Text and binary frames carry the same UTF-8 JSON, so both arrive
    /// here as raw bytes.
    pub fn parse(data: &[u8]) -> Result<Self, AppError> {
        let RawEnvelope { kind, payload } = serde_json::from_slice(data)?;

        match kind.as_str() {
            "join" => match payload {
                Some(serde_json::Value::String(room)) => Ok(ClientMessage::Join {
                    room_id: RoomId(room),
                }),
                _ => Err(AppError::InvalidPayload(kind)),
            },
            "message" => match payload {
                Some(serde_json::Value::String(payload)) => Ok(ClientMessage::Message { payload }),
                _ => Err(AppError::InvalidPayload(kind)),
            },
            _ => Ok(ClientMessage::Unknown { kind }),
        }
    }
}

/// Server → Client message
///
/// Serializes as `{"type":"message","payload":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Chat message relayed from another room member
    Message(String),
}

/// A message queued for a connection's writer task
///
/// Carries the framing of the inbound frame that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundFrame {
    pub message: ServerMessage,
    pub is_binary: bool,
}

impl OutboundFrame {
    pub fn new(message: ServerMessage, is_binary: bool) -> Self {
        Self { message, is_binary }
    }

    /// Encode into a WebSocket message, text or binary per the original frame
    pub fn to_ws_message(&self) -> Result<Message, serde_json::Error> {
        let json = serde_json::to_string(&self.message)?;
        if self.is_binary {
            Ok(Message::Binary(json.into_bytes().into()))
        } else {
            Ok(Message::Text(json.into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_join() {
        let msg = ClientMessage::parse(br#"{"type":"join","payload":"r1"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Join {
                room_id: RoomId::from("r1")
            }
        );
    }

    #[test]
    fn test_parse_message_verbatim() {
        let frame = r#"{"type":"message","payload":"  hi é "}"#;
        let msg = ClientMessage::parse(frame.as_bytes()).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Message {
                payload: "  hi é ".to_string()
            }
        );
    }

    #[test]
    fn test_parse_unknown_type() {
        let msg = ClientMessage::parse(br#"{"type":"typing","payload":42}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Unknown {
                kind: "typing".to_string()
            }
        );
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            ClientMessage::parse(b"not json"),
            Err(AppError::Json(_))
        ));
        assert!(matches!(
            ClientMessage::parse(br#"{"payload":"r1"}"#),
            Err(AppError::Json(_))
        ));
    }

    #[test]
    fn test_parse_join_without_string_payload() {
        assert!(matches!(
            ClientMessage::parse(br#"{"type":"join"}"#),
            Err(AppError::InvalidPayload(kind)) if kind == "join"
        ));
        assert!(matches!(
            ClientMessage::parse(br#"{"type":"message","payload":{"a":1}}"#),
            Err(AppError::InvalidPayload(kind)) if kind == "message"
        ));
    }

    #[test]
    fn test_server_message_serialize() {
        let msg = ServerMessage::Message("hi".to_string());
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"type":"message","payload":"hi"}"#);
    }

    #[test]
    fn test_outbound_frame_keeps_binary_flag() {
        let text = OutboundFrame::new(ServerMessage::Message("hi".to_string()), false);
        assert!(text.to_ws_message().unwrap().is_text());

        let binary = OutboundFrame::new(ServerMessage::Message("hi".to_string()), true);
        let ws_msg = binary.to_ws_message().unwrap();
        assert!(ws_msg.is_binary());
        assert_eq!(
            ws_msg.into_data(),
            br#"{"type":"message","payload":"hi"}"#.to_vec()
        );
    }
}
