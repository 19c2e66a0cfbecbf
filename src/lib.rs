//! Voice Relay - voice-channel presence and signaling over WebSocket
//!
//! This library provides the core functionality for tracking which
//! connection is in which voice channel and relaying WebRTC call-setup
//! messages between specific peers.

pub mod auth;
pub mod config;
pub mod constants;
pub mod core;
pub mod directory;
pub mod error;
pub mod handlers;

// Re-export main components
pub use config::*;
pub use constants::*;
