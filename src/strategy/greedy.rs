//! One-ply greedy opponent.
//!
//! Preference order:
//!
//! 1. a move that completes a scoring unit (a win, a box, a capture)
//! 2. the first move that does not hand the opponent one
//! 3. the fallback pick among all candidates
//!
//! Games plug in through `GreedyRules`. The defaults treat "unit" as
//! winning the game outright, which is what Nine Holes needs.

use serde::{Deserialize, Serialize};

use super::{can_move, Strategy};
use crate::core::{GameRng, Side};
use crate::games::{AnyGame, AnyMove, AnyState, DotsAndBoxes, DotsAndBoxesState, Edge, Ludo, LudoMove, LudoState, NineHoles};
use crate::rules::{GameResult, RuleEngine};

/// Last-resort choice when every candidate concedes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fallback {
    /// First candidate in enumeration order.
    #[default]
    First,
    /// Uniform among candidates.
    Random,
}

/// Per-game hooks for `Greedy`.
pub trait GreedyRules: RuleEngine {
    /// Whether `mv` scores for the side to move.
    fn completes_unit(&self, state: &Self::State, mv: &Self::Move) -> bool {
        wins_outright(self, state, mv)
    }

    /// Whether the opponent can score right after `mv`.
    fn concedes_unit(&self, state: &Self::State, mv: &Self::Move) -> bool {
        allows_winning_reply(self, state, mv)
    }

    /// Moves worth considering this turn.
    fn candidate_moves(&self, state: &Self::State, _rng: &mut GameRng) -> Vec<Self::Move> {
        self.available_moves(state)
    }
}

/// `mv` ends the game with the mover as winner.
pub fn wins_outright<E: RuleEngine + ?Sized>(engine: &E, state: &E::State, mv: &E::Move) -> bool {
    let mover = engine.turn(state);
    engine.terminal(&engine.apply(state, mv)) == Some(GameResult::Winner(mover))
}

/// After `mv`, the opponent has a move that wins outright.
pub fn allows_winning_reply<E: RuleEngine + ?Sized>(engine: &E, state: &E::State, mv: &E::Move) -> bool {
    let mover = engine.turn(state);
    let next = engine.apply(state, mv);
    if engine.terminal(&next).is_some() || engine.turn(&next) == mover {
        return false;
    }
    engine
        .available_moves(&next)
        .iter()
        .any(|reply| wins_outright(engine, &next, reply))
}

/// Greedy move selection over `GreedyRules`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Greedy {
    fallback: Fallback,
}

impl Greedy {
    #[must_use]
    pub fn new(fallback: Fallback) -> Self {
        Self { fallback }
    }
}

impl<E: GreedyRules> Strategy<E> for Greedy {
    fn select_move(
        &self,
        engine: &E,
        state: &E::State,
        side: Side,
        rng: &mut GameRng,
    ) -> Option<E::Move> {
        if !can_move(engine, state, side) {
            return None;
        }
        let candidates = engine.candidate_moves(state, rng);

        if let Some(mv) = candidates.iter().find(|mv| engine.completes_unit(state, mv)) {
            return Some(mv.clone());
        }
        if let Some(mv) = candidates.iter().find(|mv| !engine.concedes_unit(state, mv)) {
            return Some(mv.clone());
        }
        match self.fallback {
            Fallback::First => candidates.first().cloned(),
            Fallback::Random => rng.choose(&candidates).cloned(),
        }
    }
}

// =============================================================================
// Game hooks
// =============================================================================

impl GreedyRules for DotsAndBoxes {
    fn completes_unit(&self, state: &DotsAndBoxesState, mv: &Edge) -> bool {
        self.completes_box(state, *mv)
    }

    fn concedes_unit(&self, state: &DotsAndBoxesState, mv: &Edge) -> bool {
        self.offers_box(state, *mv)
    }
}

impl GreedyRules for NineHoles {}

impl GreedyRules for Ludo {
    fn completes_unit(&self, state: &LudoState, mv: &LudoMove) -> bool {
        self.captures(state, mv) || self.finishes(state, mv)
    }

    fn concedes_unit(&self, state: &LudoState, mv: &LudoMove) -> bool {
        self.lands_in_reach(state, mv)
    }

    /// Roll the die and keep the moves for that roll.
    fn candidate_moves(&self, state: &LudoState, rng: &mut GameRng) -> Vec<LudoMove> {
        let roll = rng.roll_die();
        self.available_moves(state)
            .into_iter()
            .filter(|mv| mv.roll == roll)
            .collect()
    }
}

impl GreedyRules for AnyGame {
    fn completes_unit(&self, state: &AnyState, mv: &AnyMove) -> bool {
        match (self, state, mv) {
            (AnyGame::DotsAndBoxes(g), AnyState::DotsAndBoxes(s), AnyMove::DotsAndBoxes(m)) => g.completes_unit(s, m),
            (AnyGame::Ludo(g), AnyState::Ludo(s), AnyMove::Ludo(m)) => g.completes_unit(s, m),
            _ => wins_outright(self, state, mv),
        }
    }

    fn concedes_unit(&self, state: &AnyState, mv: &AnyMove) -> bool {
        match (self, state, mv) {
            (AnyGame::DotsAndBoxes(g), AnyState::DotsAndBoxes(s), AnyMove::DotsAndBoxes(m)) => g.concedes_unit(s, m),
            (AnyGame::Ludo(g), AnyState::Ludo(s), AnyMove::Ludo(m)) => g.concedes_unit(s, m),
            _ => allows_winning_reply(self, state, mv),
        }
    }

    fn candidate_moves(&self, state: &AnyState, rng: &mut GameRng) -> Vec<AnyMove> {
        match (self, state) {
            (AnyGame::Ludo(g), AnyState::Ludo(s)) => {
                g.candidate_moves(s, rng).into_iter().map(AnyMove::Ludo).collect()
            }
            _ => self.available_moves(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Pos, SideMap};
    use crate::games::NineHolesMove;

    #[test]
    fn test_dots_prefers_completion() {
        let game = DotsAndBoxes::new(1, 2);
        let mut state = game.initial_state();
        for edge in [Edge::horizontal(0, 0), Edge::horizontal(1, 0), Edge::vertical(0, 0)] {
            state = game.apply(&state, &edge);
        }
        let side = state.turn;
        let mut rng = GameRng::new(0);
        let mv = Greedy::new(Fallback::First).select_move(&game, &state, side, &mut rng);
        assert_eq!(mv, Some(Edge::vertical(0, 1)));
    }

    #[test]
    fn test_dots_avoids_third_side() {
        let game = DotsAndBoxes::new(1, 2);
        let state = game.apply(&game.initial_state(), &Edge::horizontal(0, 0));
        let state = game.apply(&state, &Edge::horizontal(1, 0));
        // Box (0, 0) has two sides; First must not draw a third.
        let mut rng = GameRng::new(0);
        let mv = Greedy::default()
            .select_move(&game, &state, Side::First, &mut rng)
            .unwrap();
        assert!(!game.offers_box(&state, mv));
        assert_eq!(mv, Edge::horizontal(0, 1));
    }

    #[test]
    fn test_nine_holes_blocks_then_wins() {
        let game = NineHoles;
        let mut state = game.initial_state();
        for pos in [Pos::new(2, 0), Pos::new(0, 0), Pos::new(2, 1)] {
            state = game.apply(&state, &NineHolesMove::Place(pos));
        }
        let mut rng = GameRng::new(0);
        let greedy = Greedy::default();

        // Every other hole lets First finish row 2.
        assert_eq!(
            greedy.select_move(&game, &state, Side::Second, &mut rng),
            Some(NineHolesMove::Place(Pos::new(2, 2)))
        );

        let state = game.apply(&state, &NineHolesMove::Place(Pos::new(1, 1)));
        assert_eq!(
            greedy.select_move(&game, &state, Side::First, &mut rng),
            Some(NineHolesMove::Place(Pos::new(2, 2)))
        );
    }

    #[test]
    fn test_ludo_uses_one_roll() {
        let game = Ludo;
        let state = LudoState {
            tokens: SideMap::new([10, 20, 0, 0], [0; 4]),
            turn: Side::First,
            result: None,
        };
        let mut rng = GameRng::new(5);
        let mv = Greedy::default().select_move(&game, &state, Side::First, &mut rng).unwrap();
        let expected_roll = GameRng::new(5).roll_die();
        assert_eq!(mv.roll, expected_roll);
        assert!(game.is_legal(&state, &mv));
    }

    #[test]
    fn test_ludo_prefers_capture() {
        let game = Ludo;
        // Second sits three squares ahead of First's token 1.
        let state = LudoState {
            tokens: SideMap::new([40, 5, 0, 0], [34, 0, 0, 0]),
            turn: Side::First,
            result: None,
        };
        let capture = LudoMove { roll: 3, token: Some(1) };
        assert!(game.completes_unit(&state, &capture));
        assert!(!game.completes_unit(&state, &LudoMove { roll: 3, token: Some(0) }));
    }
}
