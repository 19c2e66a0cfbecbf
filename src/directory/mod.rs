//! External channel/team directory consumed read-only at join time

pub mod memory;
pub mod traits;

// Re-export main components
pub use memory::MemoryDirectory;
pub use traits::{ChannelDirectory, ChannelKind, ChannelRecord, TeamDirectory};
