//! Wire message types for the voice WebSocket protocol
//!
//! One JSON object per text frame, tagged by `event`. The `signal`
//! payload carries its own `type` field for the WebRTC message kind,
//! which is why the envelope tag is not named `type`.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Kind of a relayed call-setup message.
///
/// The closed set is offer / answer / ice-candidate; anything else is
/// carried through unmodified, since the relay never interprets payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
    Other(String),
}

impl SignalKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Offer => "offer",
            Self::Answer => "answer",
            Self::IceCandidate => "ice-candidate",
            Self::Other(kind) => kind,
        }
    }
}

impl From<&str> for SignalKind {
    fn from(kind: &str) -> Self {
        match kind {
            "offer" => Self::Offer,
            "answer" => Self::Answer,
            "ice-candidate" => Self::IceCandidate,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Serialize for SignalKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SignalKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let kind = String::deserialize(deserializer)?;
        Ok(SignalKind::from(kind.as_str()))
    }
}

/// Client-to-server message types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Join a voice channel
    #[serde(rename_all = "camelCase")]
    JoinChannel { channel_id: String },

    /// Leave a voice channel
    #[serde(rename_all = "camelCase")]
    LeaveChannel { channel_id: String },

    /// Relay a call-setup message to a specific peer
    #[serde(rename_all = "camelCase")]
    Signal {
        target_connection_id: String,
        #[serde(rename = "type")]
        kind: SignalKind,
        data: serde_json::Value,
    },
}

/// Server-to-client message types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Handshake acknowledgement; tells the client its own connection id
    #[serde(rename_all = "camelCase")]
    Connected {
        connection_id: String,
        user_id: String,
    },

    /// Sent to the joining connection only, with the peers already present
    #[serde(rename_all = "camelCase")]
    ChannelJoined {
        channel_id: String,
        existing_peers: Vec<String>,
    },

    /// Sent to the other members when a peer joins
    #[serde(rename_all = "camelCase")]
    PeerJoined {
        channel_id: String,
        connection_id: String,
        user_id: String,
    },

    /// Sent to the other members when a peer leaves or disconnects
    #[serde(rename_all = "camelCase")]
    PeerLeft {
        channel_id: String,
        connection_id: String,
    },

    /// Relayed call-setup message, sent to the addressed target only
    #[serde(rename_all = "camelCase")]
    Signal {
        from_connection_id: String,
        #[serde(rename = "type")]
        kind: SignalKind,
        data: serde_json::Value,
    },

    /// Per-request rejection, sent to the requester only
    Error { code: String, message: String },
}
