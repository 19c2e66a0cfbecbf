//! Signal relay: routes call-setup messages between specific peers
//!
//! A pure router. Payloads are opaque; the higher-level call-setup
//! protocol handles retries, so delivery is at-most-once with no
//! acknowledgement back to the sender.

use std::sync::Arc;

use crate::core::message::{ServerMessage, SignalKind};
use crate::core::registry::ConnectionRegistry;
use crate::error::{Result, VoiceRelayError};

pub struct SignalRelay {
    registry: Arc<ConnectionRegistry>,
}

impl SignalRelay {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Relay a message from one connection to a specific target.
    ///
    /// The sender must be a registered, authenticated connection, else
    /// the message is dropped with no side effect. Delivery itself is
    /// fire-and-forget: a dead target is unobservable to the sender.
    pub async fn relay(
        &self,
        from_connection_id: &str,
        to_connection_id: &str,
        kind: SignalKind,
        payload: serde_json::Value,
    ) -> Result<()> {
        if self.registry.lookup(from_connection_id).await.is_none() {
            return Err(VoiceRelayError::Forbidden(
                "Unauthenticated connection".to_string(),
            ));
        }

        let message = ServerMessage::Signal {
            from_connection_id: from_connection_id.to_string(),
            kind: kind.clone(),
            data: payload,
        };

        let delivered = self.registry.send_to(to_connection_id, &message).await;
        log::debug!(
            "Signal from {} -> {} [{}] delivered={}",
            from_connection_id,
            to_connection_id,
            kind.as_str(),
            delivered
        );

        Ok(())
    }
}
