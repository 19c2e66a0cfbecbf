use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum VoiceRelayError {
    // Auth errors: bad/missing/expired credential, connection is terminated
    AuthenticationFailed(String),
    // Authenticated but not permitted, operation rejected, connection stays alive
    Forbidden(String),

    // Referenced channel does not exist
    ChannelNotFound(String),

    // Connection errors
    ConnectionError(String),
    ConnectionClosed,

    // Messages errors
    MessageParseError(String),

    // External directory errors
    DirectoryError(String),

    // Configuration errors
    ConfigError(String),
}

impl fmt::Display for VoiceRelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthenticationFailed(msg) => write!(f, "Authentication failed: {}", msg),
            Self::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            Self::ChannelNotFound(id) => write!(f, "Channel not found: {}", id),
            Self::ConnectionError(msg) => write!(f, "Connection error: {}", msg),
            Self::ConnectionClosed => write!(f, "Connection closed unexpectedly"),
            Self::MessageParseError(msg) => write!(f, "Message parse error: {}", msg),
            Self::DirectoryError(msg) => write!(f, "Directory error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for VoiceRelayError {}

impl VoiceRelayError {
    /// Stable machine-readable code surfaced to the requesting client.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed(_) => "authentication-error",
            Self::Forbidden(_) => "authorization-error",
            Self::ChannelNotFound(_) => "not-found",
            Self::MessageParseError(_) => "bad-request",
            _ => "internal-error",
        }
    }
}

// Generic result type for the relay
pub type Result<T> = std::result::Result<T, VoiceRelayError>;
