//! Computer opponents.
//!
//! ## Overview
//!
//! A `Strategy` proposes a move for one side of a running game. It never
//! mutates the state it is given; the caller applies the returned move.
//! Three tiers are available:
//!
//! - **Search**: `Minimax`, fixed-depth search over terminal scores
//! - **Heuristic**: `Greedy`, built on per-game `GreedyRules` hooks
//! - **Random**: `UniformRandom`, uniform over `available_moves`
//!
//! `StrategyKind` names a tier as data, and `StrategyConfig::strategy_for`
//! maps each `GameId` to the tier its computer opponent uses.
//!
//! ## Usage
//!
//! ```rust
//! use boardroom::core::{GameRng, Side};
//! use boardroom::games::ConnectFour;
//! use boardroom::rules::RuleEngine;
//! use boardroom::strategy::{Minimax, Strategy};
//!
//! let game = ConnectFour;
//! let state = game.initial_state();
//! let mut rng = GameRng::new(42);
//! let column = Minimax::new(4).select_move(&game, &state, Side::First, &mut rng);
//! assert!(column.is_some());
//! ```

pub mod config;
pub mod greedy;
pub mod minimax;
pub mod random;

pub use config::StrategyConfig;
pub use greedy::{Fallback, Greedy, GreedyRules};
pub use minimax::{Minimax, WIN_SCORE};
pub use random::UniformRandom;

use serde::{Deserialize, Serialize};

use crate::core::{GameRng, Side};
use crate::games::{AnyGame, AnyMove, AnyState};
use crate::rules::RuleEngine;

/// Move selection for one side.
pub trait Strategy<E: RuleEngine> {
    /// Propose a move for `side`.
    ///
    /// Returns `None` when it is not `side`'s turn, the game is over, or no
    /// move exists.
    fn select_move(
        &self,
        engine: &E,
        state: &E::State,
        side: Side,
        rng: &mut GameRng,
    ) -> Option<E::Move>;
}

/// Whether `side` may move in `state` at all.
pub(crate) fn can_move<E: RuleEngine>(engine: &E, state: &E::State, side: Side) -> bool {
    engine.turn(state) == side && engine.terminal(state).is_none()
}

/// A strategy tier, as data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    Minimax { depth: u32 },
    Greedy(Fallback),
    UniformRandom,
}

impl Strategy<AnyGame> for StrategyKind {
    fn select_move(
        &self,
        engine: &AnyGame,
        state: &AnyState,
        side: Side,
        rng: &mut GameRng,
    ) -> Option<AnyMove> {
        match *self {
            StrategyKind::Minimax { depth } => Minimax::new(depth).select_move(engine, state, side, rng),
            StrategyKind::Greedy(fallback) => Greedy::new(fallback).select_move(engine, state, side, rng),
            StrategyKind::UniformRandom => UniformRandom.select_move(engine, state, side, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::GameId;

    #[test]
    fn test_kind_dispatch_plays_every_game() {
        let config = StrategyConfig::default();
        let mut rng = GameRng::new(config.seed);
        for id in GameId::ALL {
            let game = AnyGame::new(id);
            let state = game.initial_state();
            let kind = config.strategy_for(id);
            let mv = kind.select_move(&game, &state, Side::First, &mut rng);
            let mv = mv.unwrap_or_else(|| panic!("no move for {id}"));
            assert!(game.is_legal(&state, &mv), "{id} proposed {mv:?}");
        }
    }

    #[test]
    fn test_wrong_side_gets_nothing() {
        let game = AnyGame::new(GameId::TicTacToe);
        let state = game.initial_state();
        let mut rng = GameRng::new(1);
        assert!(StrategyKind::UniformRandom
            .select_move(&game, &state, Side::Second, &mut rng)
            .is_none());
    }
}
