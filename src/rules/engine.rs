//! Rule engine trait for game implementations.
//!
//! Games implement `RuleEngine` to define their rules:
//! - The starting position
//! - What moves are legal
//! - How a move produces the next state
//! - Win/draw conditions

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::core::Side;
use crate::games::GameId;

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(Side),
    /// Draw (no winner).
    Draw,
}

impl GameResult {
    /// Check if a side won.
    #[must_use]
    pub fn is_winner(&self, side: Side) -> bool {
        matches!(self, GameResult::Winner(s) if *s == side)
    }

    /// Score from `side`'s point of view: +1 win, -1 loss, 0 draw.
    #[must_use]
    pub fn sign_for(&self, side: Side) -> i32 {
        match self {
            GameResult::Winner(s) if *s == side => 1,
            GameResult::Winner(_) => -1,
            GameResult::Draw => 0,
        }
    }
}

/// Rule engine trait.
///
/// Engines are pure: every method takes a state by reference and `apply`
/// returns a fresh state. An engine value holds only configuration (board
/// size, secret word, ...), never the position itself.
///
/// ## Implementation Notes
///
/// - `available_moves`: Return empty once `terminal` is `Some`
/// - `apply`: Called only with legal moves; it does not re-validate
/// - `terminal`: Return `None` while the game continues
/// - `is_well_formed`: Override when a decoded state could index out of range
pub trait RuleEngine {
    /// Full game position. Serialized whole for synchronization.
    type State: Clone + Debug + PartialEq + Serialize + DeserializeOwned;

    /// A single move descriptor.
    type Move: Clone + Debug + PartialEq + Serialize + DeserializeOwned;

    /// Discriminator used to tag rooms and wire messages.
    fn game_id(&self) -> GameId;

    /// Deterministic starting position. `Side::First` moves first.
    fn initial_state(&self) -> Self::State;

    /// The side to move.
    fn turn(&self, state: &Self::State) -> Side;

    /// Enumerate all legal moves for the side to move.
    fn available_moves(&self, state: &Self::State) -> Vec<Self::Move>;

    /// Apply a legal move, returning the next state.
    ///
    /// Behavior for an illegal move is unspecified; check `is_legal` first.
    fn apply(&self, state: &Self::State, mv: &Self::Move) -> Self::State;

    /// Check if the game is over.
    fn terminal(&self, state: &Self::State) -> Option<GameResult>;

    // === Convenience Methods ===

    /// Whether `mv` is legal for the side to move.
    ///
    /// Default implementation searches `available_moves`.
    fn is_legal(&self, state: &Self::State, mv: &Self::Move) -> bool {
        self.terminal(state).is_none() && self.available_moves(state).contains(mv)
    }

    /// Whether `state` is a position this engine can play from: boards of
    /// the right size, counters and indices in range.
    ///
    /// Decoded states are checked with this before they replace a local
    /// one. Default accepts everything.
    fn is_well_formed(&self, _state: &Self::State) -> bool {
        true
    }

    /// Apply `mv` only if it is legal.
    ///
    /// Illegal moves are rejected silently by returning `None`.
    fn try_apply(&self, state: &Self::State, mv: &Self::Move) -> Option<Self::State> {
        self.is_legal(state, mv).then(|| self.apply(state, mv))
    }
}
