//! Gomoku: stones on a square board, five or more in a row on any line wins.
//!
//! `Side::First` plays black, `Side::Second` plays white.

use serde::{Deserialize, Serialize};

use crate::core::{Grid, Pos, Side, ALL_LINES};
use crate::games::GameId;
use crate::rules::{GameResult, RuleEngine};

pub const DEFAULT_SIZE: usize = 15;
const CONNECT: usize = 5;

/// Gomoku rules on a `size` x `size` board.
#[derive(Clone, Copy, Debug)]
pub struct Gomoku {
    size: usize,
}

impl Default for Gomoku {
    fn default() -> Self {
        Self { size: DEFAULT_SIZE }
    }
}

impl Gomoku {
    /// Board with a custom edge length (at least 5).
    #[must_use]
    pub fn with_size(size: usize) -> Self {
        Self {
            size: size.max(CONNECT),
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }
}

/// Gomoku position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GomokuState {
    pub stones: Grid<Option<Side>>,
    pub turn: Side,
    pub result: Option<GameResult>,
}

impl RuleEngine for Gomoku {
    type State = GomokuState;
    type Move = Pos;

    fn game_id(&self) -> GameId {
        GameId::Gomoku
    }

    fn initial_state(&self) -> GomokuState {
        GomokuState {
            stones: Grid::new(self.size, self.size, None),
            turn: Side::First,
            result: None,
        }
    }

    fn turn(&self, state: &GomokuState) -> Side {
        state.turn
    }

    fn available_moves(&self, state: &GomokuState) -> Vec<Pos> {
        if state.result.is_some() {
            return vec![];
        }
        state
            .stones
            .iter()
            .filter(|(_, cell)| cell.is_none())
            .map(|(pos, _)| pos)
            .collect()
    }

    fn is_legal(&self, state: &GomokuState, mv: &Pos) -> bool {
        state.result.is_none() && matches!(state.stones.get(*mv), Some(None))
    }

    fn apply(&self, state: &GomokuState, mv: &Pos) -> GomokuState {
        let mover = state.turn;
        let stones = state.stones.set(*mv, Some(mover));

        let result = if stones.has_line_through(*mv, CONNECT, &ALL_LINES, |c| *c == Some(mover)) {
            Some(GameResult::Winner(mover))
        } else if stones.count(Option::is_none) == 0 {
            Some(GameResult::Draw)
        } else {
            None
        };

        GomokuState {
            stones,
            turn: mover.other(),
            result,
        }
    }

    fn is_well_formed(&self, state: &GomokuState) -> bool {
        state.stones.has_shape(self.size, self.size)
    }

    fn terminal(&self, state: &GomokuState) -> Option<GameResult> {
        state.result
    }
}
