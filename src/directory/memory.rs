//! In-memory directory backend
//!
//! Default backend for the binary and fixture for tests. A production
//! deployment substitutes an implementation backed by the main database.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

use crate::directory::traits::{ChannelDirectory, ChannelRecord, TeamDirectory};
use crate::error::Result;

/// In-memory channel and team membership directory
pub struct MemoryDirectory {
    channels: RwLock<HashMap<String, ChannelRecord>>,
    /// team_id -> set of member user ids
    team_members: RwLock<HashMap<String, HashSet<String>>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            team_members: RwLock::new(HashMap::new()),
        }
    }

    /// Add or replace a channel record
    pub async fn insert_channel(&self, channel: ChannelRecord) {
        self.channels
            .write()
            .await
            .insert(channel.id.clone(), channel);
    }

    /// Add a user to a team
    pub async fn add_team_member(&self, team_id: &str, user_id: &str) {
        self.team_members
            .write()
            .await
            .entry(team_id.to_string())
            .or_insert_with(HashSet::new)
            .insert(user_id.to_string());
    }
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelDirectory for MemoryDirectory {
    async fn get_channel(&self, channel_id: &str) -> Result<Option<ChannelRecord>> {
        Ok(self.channels.read().await.get(channel_id).cloned())
    }
}

#[async_trait]
impl TeamDirectory for MemoryDirectory {
    async fn is_member(&self, team_id: &str, user_id: &str) -> Result<bool> {
        Ok(self
            .team_members
            .read()
            .await
            .get(team_id)
            .map(|members| members.contains(user_id))
            .unwrap_or(false))
    }
}
