//! Session controller coordinating registry, presence and relay
//!
//! Lifecycle per connection: authenticate exactly once, register, any
//! number of join/leave/signal requests, then a single disconnect
//! cleanup. Each connection's inbound messages are processed strictly
//! in order by its own receive loop, so no two operations for the same
//! connection interleave.

use std::sync::Arc;

use log::{debug, info};

use crate::auth::token::{extract_bearer_token, TokenManager};
use crate::core::connection::Connection;
use crate::core::message::{ServerMessage, SignalKind};
use crate::core::presence::PresenceTable;
use crate::core::registry::ConnectionRegistry;
use crate::core::relay::SignalRelay;
use crate::directory::traits::{ChannelDirectory, ChannelKind, TeamDirectory};
use crate::error::{Result, VoiceRelayError};

pub struct VoiceServer {
    registry: Arc<ConnectionRegistry>,
    presence: PresenceTable,
    relay: SignalRelay,
    channels: Arc<dyn ChannelDirectory>,
    teams: Arc<dyn TeamDirectory>,
    tokens: TokenManager,
}

impl VoiceServer {
    pub fn new(
        tokens: TokenManager,
        channels: Arc<dyn ChannelDirectory>,
        teams: Arc<dyn TeamDirectory>,
    ) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        Self {
            relay: SignalRelay::new(registry.clone()),
            registry,
            presence: PresenceTable::new(),
            channels,
            teams,
            tokens,
        }
    }

    /// Verify the handshake credential and resolve the user id.
    ///
    /// The credential comes from a `token` query parameter or the
    /// `Authorization` header, optionally `Bearer `-prefixed. Failure
    /// here is terminal for the connection: the caller closes the
    /// transport without ever registering it.
    pub fn authenticate(&self, raw_token: Option<&str>) -> Result<String> {
        let raw = raw_token.ok_or_else(|| {
            VoiceRelayError::AuthenticationFailed("Missing auth token".to_string())
        })?;

        self.tokens
            .validate_and_get_user_id(extract_bearer_token(raw))
    }

    /// Register an authenticated connection and acknowledge it
    pub async fn register_connection(
        &self,
        connection_id: &str,
        user_id: &str,
        sender: tokio::sync::mpsc::UnboundedSender<warp::ws::Message>,
    ) {
        self.registry
            .register(Connection::new(
                connection_id.to_string(),
                user_id.to_string(),
                sender,
            ))
            .await;

        self.registry
            .send_to(
                connection_id,
                &ServerMessage::Connected {
                    connection_id: connection_id.to_string(),
                    user_id: user_id.to_string(),
                },
            )
            .await;
    }

    /// Admit a connection into a voice channel.
    ///
    /// Authorization checks run in order and short-circuit: channel
    /// exists, channel is a voice channel, user is on the owning team.
    /// Check and admission are deliberately not atomic; admission is
    /// idempotent and the checks ran against directory state read
    /// immediately prior.
    pub async fn join_channel(&self, connection_id: &str, channel_id: &str) -> Result<()> {
        let user_id = self.registry.lookup(connection_id).await.ok_or_else(|| {
            VoiceRelayError::Forbidden("Unauthenticated connection".to_string())
        })?;

        let channel = self
            .channels
            .get_channel(channel_id)
            .await?
            .ok_or_else(|| VoiceRelayError::ChannelNotFound(channel_id.to_string()))?;

        if channel.kind != ChannelKind::Voice {
            return Err(VoiceRelayError::Forbidden(
                "Cannot join a non-voice channel".to_string(),
            ));
        }

        if !self.teams.is_member(&channel.team_id, &user_id).await? {
            return Err(VoiceRelayError::Forbidden(
                "You are not a member of this team and cannot join this voice channel"
                    .to_string(),
            ));
        }

        self.presence.join(channel_id, connection_id).await;

        // The peer snapshot is taken after our own admission, so two
        // connections joining at once can never both miss each other.
        let existing_peers: Vec<String> = self
            .presence
            .members_of(channel_id)
            .await
            .into_iter()
            .filter(|id| id != connection_id)
            .collect();

        self.registry
            .send_to(
                connection_id,
                &ServerMessage::ChannelJoined {
                    channel_id: channel_id.to_string(),
                    existing_peers,
                },
            )
            .await;

        self.broadcast_to_channel(
            channel_id,
            &ServerMessage::PeerJoined {
                channel_id: channel_id.to_string(),
                connection_id: connection_id.to_string(),
                user_id: user_id.clone(),
            },
            Some(connection_id),
        )
        .await;

        debug!(
            "Connection {} (userId={}) joined channel {}",
            connection_id, user_id, channel_id
        );

        Ok(())
    }

    /// Remove a connection from a channel and notify remaining members.
    ///
    /// Leaving a channel you are not in is a no-op on the table, but the
    /// departure event is still emitted for UI consistency.
    pub async fn leave_channel(&self, connection_id: &str, channel_id: &str) {
        self.presence.leave(channel_id, connection_id).await;

        self.broadcast_to_channel(
            channel_id,
            &ServerMessage::PeerLeft {
                channel_id: channel_id.to_string(),
                connection_id: connection_id.to_string(),
            },
            Some(connection_id),
        )
        .await;

        debug!("Connection {} left channel {}", connection_id, channel_id);
    }

    /// Relay a call-setup message to a specific peer
    pub async fn signal(
        &self,
        connection_id: &str,
        target_connection_id: &str,
        kind: SignalKind,
        data: serde_json::Value,
    ) -> Result<()> {
        self.relay
            .relay(connection_id, target_connection_id, kind, data)
            .await
    }

    /// Cleanup on transport closure. Never raises: every step treats
    /// absence as success, so a connection torn down mid-handshake or
    /// a repeated disconnect are both safe.
    ///
    /// Departure broadcasts run before deregistering, so the departing
    /// identity stays resolvable mid-broadcast.
    pub async fn disconnect(&self, connection_id: &str) {
        let affected = self
            .presence
            .remove_connection_everywhere(connection_id)
            .await;

        for channel_id in &affected {
            self.broadcast_to_channel(
                channel_id,
                &ServerMessage::PeerLeft {
                    channel_id: channel_id.clone(),
                    connection_id: connection_id.to_string(),
                },
                Some(connection_id),
            )
            .await;
        }

        self.registry.unregister(connection_id).await;
        info!(
            "Connection {} cleaned up (left {} channels)",
            connection_id,
            affected.len()
        );
    }

    /// Send a per-request rejection to the requester only
    pub async fn send_error(&self, connection_id: &str, error: &VoiceRelayError) {
        self.registry
            .send_to(
                connection_id,
                &ServerMessage::Error {
                    code: error.code().to_string(),
                    message: error.to_string(),
                },
            )
            .await;
    }

    /// Send a message to every current member of a channel, optionally
    /// excluding one connection. Returns the successful send count.
    async fn broadcast_to_channel(
        &self,
        channel_id: &str,
        message: &ServerMessage,
        exclude: Option<&str>,
    ) -> usize {
        let members = self.presence.members_of(channel_id).await;

        let mut sent_count = 0;
        for member_id in members {
            if exclude == Some(member_id.as_str()) {
                continue;
            }
            if self.registry.send_to(&member_id, message).await {
                sent_count += 1;
            }
        }

        sent_count
    }

    /// Number of live registered connections
    pub async fn connection_count(&self) -> usize {
        self.registry.connection_count().await
    }

    /// Snapshot of a channel's current members
    pub async fn channel_members(&self, channel_id: &str) -> Vec<String> {
        self.presence.members_of(channel_id).await
    }

    /// Number of channels with at least one member
    pub async fn active_channel_count(&self) -> usize {
        self.presence.channel_count().await
    }
}

// Shared reference to the voice server
pub type SharedVoiceServer = Arc<VoiceServer>;
