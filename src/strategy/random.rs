//! Uniform random opponent.

use super::{can_move, Strategy};
use crate::core::{GameRng, Side};
use crate::rules::RuleEngine;

/// Picks uniformly among `available_moves`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UniformRandom;

impl<E: RuleEngine> Strategy<E> for UniformRandom {
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
        rng.choose(&engine.available_moves(state)).cloned()
    }
}
