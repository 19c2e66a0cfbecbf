//! Abstract directory interfaces for pluggable backends
//!
//! The relay never owns or mutates channel/team data; it reads these
//! collaborators once per join attempt to answer two questions:
//! does this voice channel exist, and is the user on the owning team.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configured kind of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChannelKind {
    Voice,
    Text,
}

/// Channel data as seen by the relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub id: String,
    pub kind: ChannelKind,
    /// Team owning the channel's parent server
    pub team_id: String,
}

/// Channel lookup interface
#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    /// Get channel by ID; `None` when the channel does not exist
    async fn get_channel(&self, channel_id: &str) -> Result<Option<ChannelRecord>>;
}

/// Team membership lookup interface
#[async_trait]
pub trait TeamDirectory: Send + Sync {
    /// Check whether a user belongs to a team
    async fn is_member(&self, team_id: &str, user_id: &str) -> Result<bool>;
}
