//! Relay wire protocol.
//!
//! Every WebSocket binary frame carries one bincode-encoded message:
//! `ClientMessage` from client to relay, `ServerMessage` from relay to
//! client. Game state travels as an opaque byte payload; the relay never
//! decodes it.
//!
//! | client sends          | relay delivers                    | to                         |
//! |-----------------------|-----------------------------------|----------------------------|
//! | `UserOnline`          | `PresenceUpdate`                  | every connection           |
//! | `JoinGameRoom`        | nothing                           |                            |
//! | `LeaveGameRoom`       | nothing                           |                            |
//! | `GameStateUpdate`     | `GameStateUpdate`                 | other members of the room  |
//! | `ChatMessage`         | `ChatMessage`                     | every connection           |
//! | `GameChatMessage`     | `GameChatMessage`                 | every connection*          |
//! | `WebrtcSignal`        | `WebrtcSignal`                    | other members, by room name|
//!
//! *or only members of rooms with that name when the relay is configured
//! with room-scoped game chat.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Profile a client announces when it comes online.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDescriptor {
    pub id: String,
    pub username: String,
    pub avatar: String,
    pub rank: u32,
}

impl UserDescriptor {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            avatar: String::new(),
            rank: 0,
        }
    }
}

/// A chat line. Immutable once sent; clients keep their own history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub author: String,
    pub avatar: String,
    pub text: String,
    /// Milliseconds since the Unix epoch, stamped by the sender.
    pub timestamp: u64,
    pub rank: u32,
}

/// Identity of a room: a name shared by the players plus the game played.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomKey {
    pub room_name: String,
    pub game_id: String,
}

impl RoomKey {
    pub fn new(room_name: impl Into<String>, game_id: impl Into<String>) -> Self {
        Self {
            room_name: room_name.into(),
            game_id: game_id.into(),
        }
    }
}

impl std::fmt::Display for RoomKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.room_name, self.game_id)
    }
}

/// Kind of peer-connection negotiation blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalKind {
    Offer,
    Answer,
    Candidate,
}

/// Voice-call negotiation data, forwarded without inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalPayload {
    pub room_name: String,
    pub kind: SignalKind,
    pub data: String,
}

/// Client-to-relay messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientMessage {
    UserOnline(UserDescriptor),
    JoinGameRoom { room_name: String, game_id: String },
    LeaveGameRoom { room_name: String, game_id: String },
    GameStateUpdate { room_name: String, game_id: String, state: Vec<u8> },
    ChatMessage(ChatMessage),
    GameChatMessage { room_name: String, message: ChatMessage },
    WebrtcSignal(SignalPayload),
}

/// Relay-to-client messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerMessage {
    PresenceUpdate(Vec<UserDescriptor>),
    GameStateUpdate { room_name: String, game_id: String, state: Vec<u8> },
    ChatMessage(ChatMessage),
    GameChatMessage { room_name: String, message: ChatMessage },
    WebrtcSignal(SignalPayload),
}

impl ClientMessage {
    pub fn join(room: &RoomKey) -> Self {
        ClientMessage::JoinGameRoom {
            room_name: room.room_name.clone(),
            game_id: room.game_id.clone(),
        }
    }

    pub fn leave(room: &RoomKey) -> Self {
        ClientMessage::LeaveGameRoom {
            room_name: room.room_name.clone(),
            game_id: room.game_id.clone(),
        }
    }

    pub fn state_update(room: &RoomKey, state: Vec<u8>) -> Self {
        ClientMessage::GameStateUpdate {
            room_name: room.room_name.clone(),
            game_id: room.game_id.clone(),
            state,
        }
    }

    /// Encode to bytes.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl ServerMessage {
    /// Short name of the message kind, for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::PresenceUpdate(_) => "presence update",
            ServerMessage::GameStateUpdate { .. } => "state update",
            ServerMessage::ChatMessage(_) => "chat message",
            ServerMessage::GameChatMessage { .. } => "game chat message",
            ServerMessage::WebrtcSignal(_) => "signal",
        }
    }

    /// Encode to bytes.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Protocol errors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("connection closed")]
    Closed,
}
