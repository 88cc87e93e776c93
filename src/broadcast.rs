//! Room broadcast
//!
//! Fans a chat message out to every other member of a room. Sends never
//! wait on a recipient, and a failed send never changes membership; a dead
//! connection is removed when its own close event arrives.

use tracing::{debug, warn};

use crate::error::SendError;
use crate::hub::ChatHub;
use crate::message::{OutboundFrame, ServerMessage};
use crate::types::{ConnectionId, RoomId};

impl ChatHub {
    /// Send `payload` to all open members of `room_id` except `sender`
    ///
    /// Returns the number of connections the frame was queued for.
    pub fn broadcast(
        &self,
        sender: ConnectionId,
        room_id: &RoomId,
        payload: &str,
        is_binary: bool,
    ) -> usize {
        let Some(room) = self.rooms.get(room_id) else {
            debug!("Broadcast to missing room {} dropped", room_id);
            return 0;
        };

        let frame = OutboundFrame::new(ServerMessage::Message(payload.to_string()), is_binary);
        let mut delivered = 0;

        for member_id in room.members().filter(|id| *id != sender) {
            let Some(member) = self.registry.get(member_id) else {
                continue;
            };

            if !member.is_open() {
                debug!("Skipping closed client {} in room {}", member_id, room_id);
                continue;
            }

            match member.try_send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(SendError::ChannelFull) => {
                    warn!("Outbound buffer full for client {}, message dropped", member_id);
                }
                Err(SendError::ChannelClosed) => {
                    debug!("Client {} closed during broadcast", member_id);
                }
            }
        }

        debug!(
            "Client {} broadcast to {} member(s) of room {}",
            sender, delivered, room_id
        );
        delivered
    }
}
