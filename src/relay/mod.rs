//! Room relay: presence, chat, game-state and signaling fan-out.
//!
//! - `protocol`: wire messages and their bincode codec
//! - `presence`: who is online
//! - `registry`: the `Relay` membership tables and routing rules
//! - `server`: tokio WebSocket transport around one `Relay`
//! - `client`: WebSocket client for applications and tests
//!
//! The relay trusts its clients. It never validates moves or decodes game
//! state; two clients of one room converge only by replacing their state
//! with whatever arrives last.

pub mod client;
pub mod presence;
pub mod protocol;
pub mod registry;
pub mod server;

pub use client::RelayClient;
pub use presence::PresenceRegistry;
pub use protocol::{
    ChatMessage, ClientMessage, ProtocolError, RoomKey, ServerMessage, SignalKind, SignalPayload, UserDescriptor,
};
pub use registry::{ConnectionId, Envelope, Relay, RelayStats};
pub use server::{RelayServer, ServerConfig, ServerError};
