//! Whole-state synchronization between two clients of one room.
//!
//! Every local move produces a `GameStateUpdate` carrying the complete
//! bincode-encoded state. A received update for this room replaces the
//! local state outright with no merge. If both players move
//! before either update arrives, whichever update lands last wins and the
//! other move disappears from the shared view.
//!
//! A received state is decoded and checked with
//! `RuleEngine::is_well_formed` before it replaces anything. A state that
//! fails the check is rejected and the local state is kept.

use log::{debug, warn};
use std::collections::VecDeque;
use thiserror::Error;

use crate::core::Side;
use crate::relay::{ClientMessage, RoomKey, ServerMessage};
use crate::rules::RuleEngine;

/// Synchronization errors.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("state codec error: {0}")]
    Codec(#[from] bincode::Error),
    #[error("update for {got} delivered to session {expected}")]
    WrongRoom { expected: RoomKey, got: RoomKey },
    #[error("malformed state received for {0}")]
    MalformedState(RoomKey),
}

/// Replaced states kept by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

/// One participant's view of a shared game.
#[derive(Debug, Clone)]
pub struct SessionSynchronizer<E: RuleEngine> {
    engine: E,
    room: RoomKey,
    local_side: Side,
    state: E::State,
    /// Replaced states, oldest first, at most `history_limit` of them.
    history: VecDeque<E::State>,
    history_limit: usize,
}

impl<E: RuleEngine> SessionSynchronizer<E> {
    /// Session for `room_name`, playing `local_side`, from the initial state.
    pub fn new(engine: E, room_name: impl Into<String>, local_side: Side) -> Self {
        let room = RoomKey::new(room_name, engine.game_id().as_str());
        let state = engine.initial_state();
        Self {
            engine,
            room,
            local_side,
            state,
            history: VecDeque::new(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Keep at most `limit` replaced states. Zero keeps none.
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self.trim_history();
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn room(&self) -> &RoomKey {
        &self.room
    }

    pub fn local_side(&self) -> Side {
        self.local_side
    }

    /// The current local state.
    pub fn state(&self) -> &E::State {
        &self.state
    }

    /// The most recently replaced states, oldest first.
    pub fn history(&self) -> &VecDeque<E::State> {
        &self.history
    }

    /// Whether the local player may move now.
    pub fn is_my_turn(&self) -> bool {
        self.engine.turn(&self.state) == self.local_side && self.engine.terminal(&self.state).is_none()
    }

    /// Message that puts this client into the room.
    pub fn join_message(&self) -> ClientMessage {
        ClientMessage::join(&self.room)
    }

    /// Message that takes this client out of the room.
    pub fn leave_message(&self) -> ClientMessage {
        ClientMessage::leave(&self.room)
    }

    /// Apply a local move and produce the update to broadcast.
    ///
    /// Returns `Ok(None)` without touching the state when it is not the
    /// local player's turn or the move is illegal.
    pub fn play(&mut self, mv: &E::Move) -> Result<Option<ClientMessage>, SyncError> {
        if self.engine.turn(&self.state) != self.local_side {
            return Ok(None);
        }
        let Some(next) = self.engine.try_apply(&self.state, mv) else {
            return Ok(None);
        };
        self.replace(next);
        self.state_message().map(Some)
    }

    /// Start over from the initial state and produce the update that makes
    /// the other side start over too.
    pub fn replay(&mut self) -> Result<ClientMessage, SyncError> {
        let fresh = self.engine.initial_state();
        self.replace(fresh);
        self.state_message()
    }

    /// The current state as an update for this room.
    pub fn state_message(&self) -> Result<ClientMessage, SyncError> {
        let bytes = bincode::serialize(&self.state)?;
        Ok(ClientMessage::state_update(&self.room, bytes))
    }

    /// Replace the local state with a state received for `room`.
    pub fn on_remote_state(&mut self, room: &RoomKey, bytes: &[u8]) -> Result<(), SyncError> {
        if *room != self.room {
            return Err(SyncError::WrongRoom {
                expected: self.room.clone(),
                got: room.clone(),
            });
        }
        let remote: E::State = bincode::deserialize(bytes)?;
        if !self.engine.is_well_formed(&remote) {
            warn!("{} rejected malformed remote state", self.room);
            return Err(SyncError::MalformedState(self.room.clone()));
        }
        debug!("{} replaced local state with remote update", self.room);
        self.replace(remote);
        Ok(())
    }

    /// Feed any relay message. Returns whether it replaced the state;
    /// messages for other rooms and other message kinds are ignored.
    pub fn on_server_message(&mut self, message: &ServerMessage) -> Result<bool, SyncError> {
        let ServerMessage::GameStateUpdate { room_name, game_id, state } = message else {
            return Ok(false);
        };
        if *room_name != self.room.room_name || *game_id != self.room.game_id {
            return Ok(false);
        }
        let room = self.room.clone();
        self.on_remote_state(&room, state)?;
        Ok(true)
    }

    fn replace(&mut self, next: E::State) {
        let previous = std::mem::replace(&mut self.state, next);
        self.history.push_back(previous);
        self.trim_history();
    }

    fn trim_history(&mut self) {
        while self.history.len() > self.history_limit {
            self.history.pop_front();
        }
    }
}
