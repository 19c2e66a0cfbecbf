//! WebSocket connection state
//! A connection exists here only after successful authentication

use log::warn;
use tokio::sync::mpsc;
use warp::ws::Message;

use crate::core::message::ServerMessage;

/// A live, authenticated client transport session
pub struct Connection {
    /// Opaque id issued at transport establishment
    pub id: String,
    /// Authenticated user id; set exactly once, immutable thereafter
    pub user_id: String,
    pub sender: mpsc::UnboundedSender<Message>,
}

impl Connection {
    pub fn new(id: String, user_id: String, sender: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            id,
            user_id,
            sender,
        }
    }

    /// Serialize and send a server message through this connection.
    /// Best-effort: a closed channel yields `false`, never an error.
    pub fn send(&self, message: &ServerMessage) -> bool {
        let text = match serde_json::to_string(message) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to serialize message for client {}: {}", self.id, e);
                return false;
            }
        };

        match self.sender.send(Message::text(text)) {
            Ok(_) => true,
            Err(_) => {
                warn!("Failed to send message to client {}", self.id);
                false
            }
        }
    }
}
