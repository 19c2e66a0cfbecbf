//! Channel presence table: which connections are in which voice channel
//!
//! Membership and cleanup are centralized here so a disconnect, which
//! carries no record of joined channels, resolves in one pass. The
//! gateway never has to remember per-connection channel lists.

use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

/// Live membership of all voice channels.
///
/// Invariant: a channel id has an entry iff its member set is non-empty.
/// The single lock serializes all mutations, which is the required
/// per-channel mutual exclusion (channel counts are small).
pub struct PresenceTable {
    channels: RwLock<HashMap<String, HashSet<String>>>,
}

impl PresenceTable {
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Add a connection to a channel, creating the entry if absent.
    /// Joining twice has the effect of joining once.
    pub async fn join(&self, channel_id: &str, connection_id: &str) {
        self.channels
            .write()
            .await
            .entry(channel_id.to_string())
            .or_insert_with(HashSet::new)
            .insert(connection_id.to_string());
        log::debug!("Connection {} joined channel {}", connection_id, channel_id);
    }

    /// Remove a connection from a channel; returns whether a removal
    /// occurred. Deletes the entry when the set becomes empty.
    pub async fn leave(&self, channel_id: &str, connection_id: &str) -> bool {
        let mut channels = self.channels.write().await;

        let removed = match channels.get_mut(channel_id) {
            Some(members) => members.remove(connection_id),
            None => false,
        };

        if removed {
            log::debug!("Connection {} left channel {}", connection_id, channel_id);
            if channels
                .get(channel_id)
                .map(|members| members.is_empty())
                .unwrap_or(false)
            {
                channels.remove(channel_id);
                log::debug!("Channel {} is now empty and removed", channel_id);
            }
        }

        removed
    }

    /// Remove a connection from every channel in one pass; returns the
    /// channel ids it was removed from. Primary disconnect operation;
    /// calling it again for the same connection returns an empty list.
    pub async fn remove_connection_everywhere(&self, connection_id: &str) -> Vec<String> {
        let mut channels = self.channels.write().await;
        let mut affected = Vec::new();

        channels.retain(|channel_id, members| {
            if members.remove(connection_id) {
                affected.push(channel_id.clone());
                if members.is_empty() {
                    log::debug!("Channel {} is now empty and removed", channel_id);
                    return false;
                }
            }
            true
        });

        affected
    }

    /// Snapshot of a channel's members; empty for unknown channels
    pub async fn members_of(&self, channel_id: &str) -> Vec<String> {
        self.channels
            .read()
            .await
            .get(channel_id)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of channels with at least one member
    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }
}

impl Default for PresenceTable {
    fn default() -> Self {
        Self::new()
    }
}
