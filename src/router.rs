//! Inbound frame routing
//!
//! Decodes one frame and dispatches it to join or broadcast. Every failure
//! is returned as an `AppError` for the caller to log; none of them end the
//! connection or touch hub state.

use tracing::warn;

use crate::error::AppError;
use crate::hub::ChatHub;
use crate::message::ClientMessage;
use crate::types::ConnectionId;

impl ChatHub {
    /// Handle one inbound frame from `id`
    pub fn on_frame(
        &mut self,
        id: ConnectionId,
        data: &[u8],
        is_binary: bool,
    ) -> Result<(), AppError> {
        if !self.is_registered(id) {
            return Err(AppError::UnknownConnection(id));
        }

        match ClientMessage::parse(data)? {
            ClientMessage::Join { room_id } => {
                self.join(id, room_id);
            }
            ClientMessage::Message { payload } => {
                let room_id = self.current_room(id).cloned().ok_or(AppError::NotInRoom)?;
                self.broadcast(id, &room_id, &payload, is_binary);
            }
            ClientMessage::Unknown { kind } => {
                warn!("Unknown message type '{}' from client {}", kind, id);
            }
        }

        Ok(())
    }
}
