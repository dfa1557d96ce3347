//! Connect Four: 6x7 board, pieces drop to the lowest free row, four in a
//! row on any line wins.
//!
//! `Side::First` plays Red (`R`), `Side::Second` plays Yellow (`Y`).
//! Row 0 is the bottom row.

use serde::{Deserialize, Serialize};

use crate::core::{Grid, Pos, Side, ALL_LINES};
use crate::games::GameId;
use crate::rules::{GameResult, RuleEngine};

pub const ROWS: usize = 6;
pub const COLS: usize = 7;
const CONNECT: usize = 4;

/// Connect Four rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConnectFour;

/// Connect Four position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectFourState {
    pub cells: Grid<Option<Side>>,
    pub turn: Side,
    pub result: Option<GameResult>,
}

impl ConnectFourState {
    /// Lowest free row in `col`, or `None` if the column is full.
    #[must_use]
    pub fn drop_row(&self, col: usize) -> Option<usize> {
        (0..self.cells.rows()).find(|&row| matches!(self.cells.get(Pos::new(row, col)), Some(None)))
    }

    /// Display symbol at `pos`: `R`, `Y` or `.`.
    #[must_use]
    pub fn symbol_at(&self, pos: Pos) -> char {
        match self.cells.get(pos) {
            Some(Some(side)) => side.label(('R', 'Y')),
            _ => '.',
        }
    }
}

impl RuleEngine for ConnectFour {
    type State = ConnectFourState;
    /// Column index.
    type Move = usize;

    fn game_id(&self) -> GameId {
        GameId::ConnectFour
    }

    fn initial_state(&self) -> ConnectFourState {
        ConnectFourState {
            cells: Grid::new(ROWS, COLS, None),
            turn: Side::First,
            result: None,
        }
    }

    fn turn(&self, state: &ConnectFourState) -> Side {
        state.turn
    }

    /// Open columns in ascending order.
    fn available_moves(&self, state: &ConnectFourState) -> Vec<usize> {
        if state.result.is_some() {
            return vec![];
        }
        (0..COLS).filter(|&col| state.drop_row(col).is_some()).collect()
    }

    fn is_legal(&self, state: &ConnectFourState, mv: &usize) -> bool {
        state.result.is_none() && *mv < COLS && state.drop_row(*mv).is_some()
    }

    fn apply(&self, state: &ConnectFourState, mv: &usize) -> ConnectFourState {
        let mover = state.turn;
        let Some(row) = state.drop_row(*mv) else {
            return state.clone();
        };
        let pos = Pos::new(row, *mv);
        let cells = state.cells.set(pos, Some(mover));

        let result = if cells.has_line_through(pos, CONNECT, &ALL_LINES, |c| *c == Some(mover)) {
            Some(GameResult::Winner(mover))
        } else if cells.count(Option::is_none) == 0 {
            Some(GameResult::Draw)
        } else {
            None
        };

        ConnectFourState {
            cells,
            turn: mover.other(),
            result,
        }
    }

    fn is_well_formed(&self, state: &ConnectFourState) -> bool {
        state.cells.has_shape(ROWS, COLS)
    }

    fn terminal(&self, state: &ConnectFourState) -> Option<GameResult> {
        state.result
    }
}
