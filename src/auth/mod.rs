//! Authentication module: bearer-token verification for the handshake

pub mod token;

// Re-export main components
pub use token::{extract_bearer_token, Claims, TokenManager};
