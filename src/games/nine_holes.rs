//! Nine Holes: a 3x3 placement-then-movement game.
//!
//! Each side places three pieces, one per turn. Once a side has placed all
//! of its pieces it moves one piece per turn to an orthogonally adjacent
//! empty hole. Three in a row along a row or column wins; diagonals do not
//! count. A side left without a move ends the game in a draw.

use serde::{Deserialize, Serialize};

use crate::core::{Grid, Pos, Side, SideMap, ORTHOGONAL_LINES, ORTHOGONAL_STEPS};
use crate::games::GameId;
use crate::rules::{GameResult, RuleEngine};

const SIZE: usize = 3;
pub const PIECES_PER_SIDE: u8 = 3;

/// Nine Holes rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct NineHoles;

/// A Nine Holes move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NineHolesMove {
    /// Put a new piece into an empty hole.
    Place(Pos),
    /// Move an own piece to an adjacent empty hole.
    Slide { from: Pos, to: Pos },
}

impl NineHolesMove {
    /// The hole the moving piece ends up in.
    #[must_use]
    pub fn destination(&self) -> Pos {
        match self {
            NineHolesMove::Place(pos) => *pos,
            NineHolesMove::Slide { to, .. } => *to,
        }
    }
}

/// Nine Holes position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NineHolesState {
    pub holes: Grid<Option<Side>>,
    pub placed: SideMap<u8>,
    pub turn: Side,
    pub result: Option<GameResult>,
}

impl NineHolesState {
    /// Whether `side` still has pieces to place.
    #[must_use]
    pub fn placing(&self, side: Side) -> bool {
        self.placed[side] < PIECES_PER_SIDE
    }
}

impl NineHoles {
    fn moves_for(&self, holes: &Grid<Option<Side>>, placed: &SideMap<u8>, side: Side) -> Vec<NineHolesMove> {
        if placed[side] < PIECES_PER_SIDE {
            return holes
                .iter()
                .filter(|(_, hole)| hole.is_none())
                .map(|(pos, _)| NineHolesMove::Place(pos))
                .collect();
        }

        let mut moves = Vec::new();
        for (from, hole) in holes.iter() {
            if *hole != Some(side) {
                continue;
            }
            for (dr, dc) in ORTHOGONAL_STEPS {
                if let Some(to) = holes.offset(from, dr, dc) {
                    if matches!(holes.get(to), Some(None)) {
                        moves.push(NineHolesMove::Slide { from, to });
                    }
                }
            }
        }
        moves
    }
}

impl RuleEngine for NineHoles {
    type State = NineHolesState;
    type Move = NineHolesMove;

    fn game_id(&self) -> GameId {
        GameId::NineHoles
    }

    fn initial_state(&self) -> NineHolesState {
        NineHolesState {
            holes: Grid::new(SIZE, SIZE, None),
            placed: SideMap::with_value(0),
            turn: Side::First,
            result: None,
        }
    }

    fn turn(&self, state: &NineHolesState) -> Side {
        state.turn
    }

    fn available_moves(&self, state: &NineHolesState) -> Vec<NineHolesMove> {
        if state.result.is_some() {
            return vec![];
        }
        self.moves_for(&state.holes, &state.placed, state.turn)
    }

    fn apply(&self, state: &NineHolesState, mv: &NineHolesMove) -> NineHolesState {
        let mover = state.turn;
        let mut placed = state.placed;
        let holes = match *mv {
            NineHolesMove::Place(pos) => {
                placed[mover] = placed[mover].saturating_add(1);
                state.holes.set(pos, Some(mover))
            }
            NineHolesMove::Slide { from, to } => state.holes.set(from, None).set(to, Some(mover)),
        };

        let landing = mv.destination();
        let result = if holes.has_line_through(landing, SIZE, &ORTHOGONAL_LINES, |h| *h == Some(mover)) {
            Some(GameResult::Winner(mover))
        } else if self.moves_for(&holes, &placed, mover.other()).is_empty() {
            Some(GameResult::Draw)
        } else {
            None
        };

        NineHolesState {
            holes,
            placed,
            turn: mover.other(),
            result,
        }
    }

    fn is_well_formed(&self, state: &NineHolesState) -> bool {
        state.holes.has_shape(SIZE, SIZE) && state.placed.iter().all(|(_, n)| *n <= PIECES_PER_SIDE)
    }

    fn terminal(&self, state: &NineHolesState) -> Option<GameResult> {
        state.result
    }
}
