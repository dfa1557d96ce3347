//! Computer opponent configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Fallback, StrategyKind};
use crate::games::GameId;

/// Computer opponent configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Minimax search depth in plies, counting the move being chosen.
    pub depth: u32,

    /// Seed for random choices (fallback picks, die rolls, hidden setup).
    /// Same seed produces the same games.
    pub seed: u64,

    /// Pause before a computer move is shown.
    /// Pacing only; the caller waits, strategies never sleep.
    pub move_delay: Duration,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            depth: 4,
            seed: 42,
            move_delay: Duration::from_millis(600),
        }
    }
}

impl StrategyConfig {
    /// Create a new config with custom search depth.
    #[must_use]
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Create a new config with custom seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a new config with custom move delay.
    #[must_use]
    pub fn with_move_delay(mut self, delay: Duration) -> Self {
        self.move_delay = delay;
        self
    }

    /// The computer opponent used for `game`.
    ///
    /// | game                         | strategy                      |
    /// |------------------------------|-------------------------------|
    /// | Connect Four                 | minimax at `depth`            |
    /// | Dots-and-Boxes, Nine Holes   | greedy, first-move fallback   |
    /// | Ludo                         | greedy over a random die roll |
    /// | everything else              | uniform random                |
    #[must_use]
    pub fn strategy_for(&self, game: GameId) -> StrategyKind {
        match game {
            GameId::ConnectFour => StrategyKind::Minimax { depth: self.depth },
            GameId::DotsAndBoxes | GameId::NineHoles | GameId::Ludo => {
                StrategyKind::Greedy(Fallback::First)
            }
            GameId::TicTacToe
            | GameId::Checkers
            | GameId::Chess
            | GameId::Gomoku
            | GameId::Hangman
            | GameId::GuessWho => StrategyKind::UniformRandom,
        }
    }
}
