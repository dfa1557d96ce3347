//! Fixed-depth minimax search.
//!
//! Only terminal positions are scored: `+WIN_SCORE` for a win of the
//! searching side, `-WIN_SCORE` for a loss, 0 for a draw or a position
//! left open at the depth limit. Whose ply it is comes from
//! `RuleEngine::turn`, so extra-move rules are searched correctly.
//!
//! Among equally scored root moves the first one in `available_moves`
//! order is kept. For Connect Four that is the lowest column, which makes
//! the choice reproducible.

use super::{can_move, Strategy};
use crate::core::{GameRng, Side};
use crate::rules::{GameResult, RuleEngine};

/// Score of a won terminal position.
pub const WIN_SCORE: i32 = 100;

/// Minimax search to a fixed number of plies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Minimax {
    depth: u32,
}

impl Minimax {
    /// Search `depth` plies deep (at least 1).
    #[must_use]
    pub fn new(depth: u32) -> Self {
        Self { depth: depth.max(1) }
    }

    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    fn score<E: RuleEngine>(&self, engine: &E, state: &E::State, side: Side, depth: u32) -> i32 {
        if let Some(result) = engine.terminal(state) {
            return result.sign_for(side) * WIN_SCORE;
        }
        if depth == 0 {
            return 0;
        }

        let maximizing = engine.turn(state) == side;
        let scores = engine
            .available_moves(state)
            .into_iter()
            .map(|mv| self.score(engine, &engine.apply(state, &mv), side, depth - 1));

        let best = if maximizing { scores.max() } else { scores.min() };
        best.unwrap_or(0)
    }
}

impl Default for Minimax {
    fn default() -> Self {
        Self::new(4)
    }
}

impl<E: RuleEngine> Strategy<E> for Minimax {
    fn select_move(
        &self,
        engine: &E,
        state: &E::State,
        side: Side,
        _rng: &mut GameRng,
    ) -> Option<E::Move> {
        if !can_move(engine, state, side) {
            return None;
        }
        let moves = engine.available_moves(state);

        // An immediate win beats anything the search might tie it with.
        if let Some(win) = moves
            .iter()
            .find(|mv| engine.terminal(&engine.apply(state, mv)) == Some(GameResult::Winner(side)))
        {
            return Some(win.clone());
        }

        let mut best: Option<(i32, E::Move)> = None;
        for mv in moves {
            let score = self.score(engine, &engine.apply(state, &mv), side, self.depth - 1);
            if best.as_ref().map_or(true, |(top, _)| score > *top) {
                best = Some((score, mv));
            }
        }
        best.map(|(_, mv)| mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Pos;
    use crate::games::{ConnectFour, TicTacToe};

    #[test]
    fn test_first_column_on_empty_board() {
        let game = ConnectFour;
        let state = game.initial_state();
        let mut rng = GameRng::new(0);
        // Nothing is decided within 4 plies, so every column ties at 0.
        assert_eq!(Minimax::new(4).select_move(&game, &state, Side::First, &mut rng), Some(0));
    }

    #[test]
    fn test_tictactoe_takes_win() {
        let game = TicTacToe;
        let mut state = game.initial_state();
        for pos in [Pos::new(0, 0), Pos::new(1, 0), Pos::new(0, 1), Pos::new(1, 1)] {
            state = game.apply(&state, &pos);
        }
        let mut rng = GameRng::new(0);
        let mv = Minimax::new(3).select_move(&game, &state, Side::First, &mut rng);
        assert_eq!(mv, Some(Pos::new(0, 2)));
    }

    #[test]
    fn test_tictactoe_blocks() {
        let game = TicTacToe;
        let mut state = game.initial_state();
        for pos in [Pos::new(0, 0), Pos::new(1, 1), Pos::new(0, 1)] {
            state = game.apply(&state, &pos);
        }
        let mut rng = GameRng::new(0);
        let mv = Minimax::new(2).select_move(&game, &state, Side::Second, &mut rng);
        assert_eq!(mv, Some(Pos::new(0, 2)));
    }

    #[test]
    fn test_depth_clamped() {
        assert_eq!(Minimax::new(0).depth(), 1);
        assert_eq!(Minimax::default().depth(), 4);
    }
}
