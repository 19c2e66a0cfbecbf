//! Connection registry: socket id to authenticated user identity
//!
//! Pure mapping store. No authentication logic lives here; channel
//! membership cleanup on disconnect is the gateway's responsibility.

use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::core::connection::Connection;
use crate::core::message::ServerMessage;

/// Owns every live connection for its lifetime
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<String, Connection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or overwrite the mapping for a connection id. Idempotent.
    pub async fn register(&self, connection: Connection) {
        log::debug!(
            "Connection registered: {} (userId={})",
            connection.id,
            connection.user_id
        );
        self.connections
            .write()
            .await
            .insert(connection.id.clone(), connection);
    }

    /// Remove the mapping. Absent ids are a quiet no-op.
    pub async fn unregister(&self, connection_id: &str) {
        self.connections.write().await.remove(connection_id);
    }

    /// Resolve a connection id to its authenticated user id
    pub async fn lookup(&self, connection_id: &str) -> Option<String> {
        self.connections
            .read()
            .await
            .get(connection_id)
            .map(|connection| connection.user_id.clone())
    }

    /// Best-effort send to one connection; `false` when the target is
    /// not registered or its channel has closed
    pub async fn send_to(&self, connection_id: &str, message: &ServerMessage) -> bool {
        match self.connections.read().await.get(connection_id) {
            Some(connection) => connection.send(message),
            None => false,
        }
    }

    /// Number of live registered connections
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
