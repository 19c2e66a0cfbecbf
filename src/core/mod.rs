//! Core functionality for the signaling server

pub mod connection;
pub mod gateway;
pub mod message;
pub mod presence;
pub mod registry;
pub mod relay;

// Re-export main components for convenience
pub use connection::Connection;
pub use gateway::{SharedVoiceServer, VoiceServer};
pub use message::{ClientMessage, ServerMessage, SignalKind};
pub use presence::PresenceTable;
pub use registry::ConnectionRegistry;
pub use relay::SignalRelay;
