//! The relay's membership and presence tables.
//!
//! `Relay` is a plain state machine: each operation updates the tables and
//! returns the envelopes to deliver, in ascending connection order. It does
//! no I/O and holds no locks; the server feeds it one message at a time
//! from a single task, which is the whole concurrency story.
//!
//! The relay never looks inside game state or signaling payloads, and no
//! operation reports failure to the sender. Routing to a room with no other
//! members simply yields no envelopes.

use log::{debug, info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::presence::PresenceRegistry;
use super::protocol::{ChatMessage, ClientMessage, RoomKey, ServerMessage, SignalPayload, UserDescriptor};

/// Relay-assigned connection identifier, unique for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(pub u64);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn#{}", self.0)
    }
}

/// A message addressed to one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub to: ConnectionId,
    pub message: ServerMessage,
}

/// Relay statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayStats {
    pub connections: usize,
    pub rooms: usize,
    pub online_users: usize,
    /// Envelopes produced.
    pub routed: u64,
    /// Envelopes the transport could not deliver.
    pub dropped: u64,
}

/// Membership and presence tables for every live connection.
#[derive(Debug, Default)]
pub struct Relay {
    next_id: u64,
    /// Live connections and the rooms each has joined.
    connections: BTreeMap<ConnectionId, BTreeSet<RoomKey>>,
    /// Room members. A room exists only while it has members.
    rooms: FxHashMap<RoomKey, BTreeSet<ConnectionId>>,
    presence: PresenceRegistry,
    room_scoped_game_chat: bool,
    routed: u64,
    dropped: u64,
}

impl Relay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver game chat only to members of rooms with the message's room
    /// name instead of to everyone.
    pub fn with_room_scoped_game_chat(mut self, scoped: bool) -> Self {
        self.room_scoped_game_chat = scoped;
        self
    }

    // =========================================================================
    // Connection lifecycle
    // =========================================================================

    /// Register a new connection.
    pub fn connect(&mut self) -> ConnectionId {
        self.next_id += 1;
        let id = ConnectionId(self.next_id);
        self.connections.insert(id, BTreeSet::new());
        info!("{id} connected ({} live)", self.connections.len());
        id
    }

    pub fn is_connected(&self, conn: ConnectionId) -> bool {
        self.connections.contains_key(&conn)
    }

    /// Remove `conn` from presence and every room, then send the new
    /// presence list to everyone left.
    pub fn disconnect(&mut self, conn: ConnectionId) -> Vec<Envelope> {
        let Some(joined) = self.connections.remove(&conn) else {
            warn!("disconnect for unknown {conn}");
            return vec![];
        };
        for room in &joined {
            self.remove_member(room, conn);
        }
        self.presence.remove(conn);
        info!("{conn} disconnected ({} live)", self.connections.len());
        self.presence_to_all()
    }

    // =========================================================================
    // Rooms
    // =========================================================================

    /// Add `conn` to `room`, creating the room if needed. Idempotent.
    ///
    /// Nothing is sent: a joiner sees the board only after the next move.
    pub fn join(&mut self, conn: ConnectionId, room: RoomKey) -> bool {
        let Some(joined) = self.connections.get_mut(&conn) else {
            warn!("join from unknown {conn}");
            return false;
        };
        let added = joined.insert(room.clone());
        if added {
            info!("{conn} joined {room}");
            self.rooms.entry(room).or_default().insert(conn);
        }
        added
    }

    /// Remove `conn` from `room`. The room disappears with its last member.
    pub fn leave(&mut self, conn: ConnectionId, room: &RoomKey) -> bool {
        let left = self
            .connections
            .get_mut(&conn)
            .is_some_and(|joined| joined.remove(room));
        if left {
            self.remove_member(room, conn);
            info!("{conn} left {room}");
        }
        left
    }

    fn remove_member(&mut self, room: &RoomKey, conn: ConnectionId) {
        if let Some(members) = self.rooms.get_mut(room) {
            members.remove(&conn);
            if members.is_empty() {
                self.rooms.remove(room);
                debug!("room {room} closed");
            }
        }
    }

    /// Members of `room`, ascending.
    pub fn members(&self, room: &RoomKey) -> Vec<ConnectionId> {
        self.rooms
            .get(room)
            .map(|m| m.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Rooms `conn` has joined.
    pub fn rooms_of(&self, conn: ConnectionId) -> Vec<RoomKey> {
        self.connections
            .get(&conn)
            .map(|r| r.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Members of any room called `room_name`, whatever the game.
    fn members_by_name(&self, room_name: &str) -> BTreeSet<ConnectionId> {
        self.rooms
            .iter()
            .filter(|(key, _)| key.room_name == room_name)
            .flat_map(|(_, members)| members.iter().copied())
            .collect()
    }

    // =========================================================================
    // Routing
    // =========================================================================

    /// Forward a game state to every other member of `room`.
    pub fn broadcast_state(&mut self, sender: ConnectionId, room: &RoomKey, state: Vec<u8>) -> Vec<Envelope> {
        if !self.known(sender) {
            return vec![];
        }
        let recipients: Vec<_> = self
            .rooms
            .get(room)
            .into_iter()
            .flatten()
            .copied()
            .filter(|c| *c != sender)
            .collect();
        let message = ServerMessage::GameStateUpdate {
            room_name: room.room_name.clone(),
            game_id: room.game_id.clone(),
            state,
        };
        debug!("{sender} state update in {room} -> {} members", recipients.len());
        self.address(recipients, message)
    }

    /// Store `user` as `conn`'s presence and send the full list to everyone.
    pub fn announce_presence(&mut self, conn: ConnectionId, user: UserDescriptor) -> Vec<Envelope> {
        if !self.known(conn) {
            return vec![];
        }
        info!("{conn} online as {}", user.username);
        self.presence.announce(conn, user);
        self.presence_to_all()
    }

    /// General chat goes to every connection, sender included.
    pub fn relay_chat(&mut self, sender: ConnectionId, message: ChatMessage) -> Vec<Envelope> {
        if !self.known(sender) {
            return vec![];
        }
        let everyone: Vec<ConnectionId> = self.connections.keys().copied().collect();
        self.address(everyone, ServerMessage::ChatMessage(message))
    }

    /// In-game chat. Global unless room-scoped game chat is enabled.
    pub fn relay_game_chat(&mut self, sender: ConnectionId, room_name: String, message: ChatMessage) -> Vec<Envelope> {
        if !self.known(sender) {
            return vec![];
        }
        let recipients: Vec<ConnectionId> = if self.room_scoped_game_chat {
            self.members_by_name(&room_name).into_iter().collect()
        } else {
            self.connections.keys().copied().collect()
        };
        self.address(recipients, ServerMessage::GameChatMessage { room_name, message })
    }

    /// Forward signaling data to the other members of every room with the
    /// payload's room name.
    pub fn relay_signal(&mut self, sender: ConnectionId, payload: SignalPayload) -> Vec<Envelope> {
        if !self.known(sender) {
            return vec![];
        }
        let recipients: Vec<ConnectionId> = self
            .members_by_name(&payload.room_name)
            .into_iter()
            .filter(|c| *c != sender)
            .collect();
        self.address(recipients, ServerMessage::WebrtcSignal(payload))
    }

    /// Dispatch one client message.
    pub fn handle(&mut self, conn: ConnectionId, message: ClientMessage) -> Vec<Envelope> {
        match message {
            ClientMessage::UserOnline(user) => self.announce_presence(conn, user),
            ClientMessage::JoinGameRoom { room_name, game_id } => {
                self.join(conn, RoomKey { room_name, game_id });
                vec![]
            }
            ClientMessage::LeaveGameRoom { room_name, game_id } => {
                self.leave(conn, &RoomKey { room_name, game_id });
                vec![]
            }
            ClientMessage::GameStateUpdate { room_name, game_id, state } => {
                self.broadcast_state(conn, &RoomKey { room_name, game_id }, state)
            }
            ClientMessage::ChatMessage(message) => self.relay_chat(conn, message),
            ClientMessage::GameChatMessage { room_name, message } => self.relay_game_chat(conn, room_name, message),
            ClientMessage::WebrtcSignal(payload) => self.relay_signal(conn, payload),
        }
    }

    // =========================================================================
    // Bookkeeping
    // =========================================================================

    /// Record envelopes the transport failed to deliver.
    pub fn note_dropped(&mut self, count: u64) {
        self.dropped += count;
    }

    pub fn presence(&self) -> &PresenceRegistry {
        &self.presence
    }

    pub fn stats(&self) -> RelayStats {
        RelayStats {
            connections: self.connections.len(),
            rooms: self.rooms.len(),
            online_users: self.presence.len(),
            routed: self.routed,
            dropped: self.dropped,
        }
    }

    fn known(&self, conn: ConnectionId) -> bool {
        let known = self.is_connected(conn);
        if !known {
            warn!("message from unknown {conn} ignored");
        }
        known
    }

    fn presence_to_all(&mut self) -> Vec<Envelope> {
        let everyone: Vec<ConnectionId> = self.connections.keys().copied().collect();
        self.address(everyone, ServerMessage::PresenceUpdate(self.presence.snapshot()))
    }

    fn address(&mut self, recipients: Vec<ConnectionId>, message: ServerMessage) -> Vec<Envelope> {
        self.routed += recipients.len() as u64;
        recipients
            .into_iter()
            .map(|to| Envelope { to, message: message.clone() })
            .collect()
    }
}
