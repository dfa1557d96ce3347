//! Client-side game sessions.
//!
//! - `SessionSynchronizer`: one player's copy of a game shared through a
//!   relay room, kept in step by whole-state replacement
//! - `ComputerMatch`: a local game against a computer opponent

pub mod computer;
pub mod synchronizer;

pub use computer::ComputerMatch;
pub use synchronizer::{SessionSynchronizer, SyncError, DEFAULT_HISTORY_LIMIT};
