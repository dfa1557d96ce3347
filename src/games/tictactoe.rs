//! Tic-Tac-Toe: 3x3 board, three in a row on any line wins.
//!
//! `Side::First` plays X, `Side::Second` plays O.

use serde::{Deserialize, Serialize};

use crate::core::{Grid, Pos, Side, ALL_LINES};
use crate::games::GameId;
use crate::rules::{GameResult, RuleEngine};

const SIZE: usize = 3;

/// Tic-Tac-Toe rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct TicTacToe;

/// Tic-Tac-Toe position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToeState {
    pub cells: Grid<Option<Side>>,
    pub turn: Side,
    pub result: Option<GameResult>,
}

impl TicTacToeState {
    /// Display symbol of the cell at row-major `index`: `X`, `O` or a space.
    #[must_use]
    pub fn symbol_at(&self, index: usize) -> char {
        match self.cells.get_index(index) {
            Some(Some(side)) => side.label(('X', 'O')),
            _ => ' ',
        }
    }
}

impl RuleEngine for TicTacToe {
    type State = TicTacToeState;
    type Move = Pos;

    fn game_id(&self) -> GameId {
        GameId::TicTacToe
    }

    fn initial_state(&self) -> TicTacToeState {
        TicTacToeState {
            cells: Grid::new(SIZE, SIZE, None),
            turn: Side::First,
            result: None,
        }
    }

    fn turn(&self, state: &TicTacToeState) -> Side {
        state.turn
    }

    fn available_moves(&self, state: &TicTacToeState) -> Vec<Pos> {
        if state.result.is_some() {
            return vec![];
        }
        state
            .cells
            .iter()
            .filter(|(_, cell)| cell.is_none())
            .map(|(pos, _)| pos)
            .collect()
    }

    fn is_legal(&self, state: &TicTacToeState, mv: &Pos) -> bool {
        state.result.is_none() && matches!(state.cells.get(*mv), Some(None))
    }

    fn apply(&self, state: &TicTacToeState, mv: &Pos) -> TicTacToeState {
        let mover = state.turn;
        let cells = state.cells.set(*mv, Some(mover));

        let result = if cells.has_line_through(*mv, SIZE, &ALL_LINES, |c| *c == Some(mover)) {
            Some(GameResult::Winner(mover))
        } else if cells.count(Option::is_none) == 0 {
            Some(GameResult::Draw)
        } else {
            None
        };

        TicTacToeState {
            cells,
            turn: mover.other(),
            result,
        }
    }

    fn is_well_formed(&self, state: &TicTacToeState) -> bool {
        state.cells.has_shape(SIZE, SIZE)
    }

    fn terminal(&self, state: &TicTacToeState) -> Option<GameResult> {
        state.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(moves: &[(usize, usize)]) -> TicTacToeState {
        let game = TicTacToe;
        moves.iter().fold(game.initial_state(), |state, &(r, c)| {
            game.try_apply(&state, &Pos::new(r, c)).expect("legal move")
        })
    }

    #[test]
    fn test_initial_state() {
        let game = TicTacToe;
        let state = game.initial_state();
        assert_eq!(state.turn, Side::First);
        assert_eq!(game.terminal(&state), None);
        assert_eq!(game.available_moves(&state).len(), 9);
    }

    #[test]
    fn test_center_move() {
        let state = play(&[(1, 1)]);
        assert_eq!(state.symbol_at(4), 'X');
        assert_eq!(state.turn, Side::Second);
    }

    #[test]
    fn test_occupied_cell_rejected() {
        let game = TicTacToe;
        let state = play(&[(1, 1)]);
        assert!(!game.is_legal(&state, &Pos::new(1, 1)));
        assert!(game.try_apply(&state, &Pos::new(1, 1)).is_none());
        assert!(!game.is_legal(&state, &Pos::new(3, 0)));
    }

    #[test]
    fn test_diagonal_win() {
        let game = TicTacToe;
        let state = play(&[(0, 0), (0, 1), (1, 1), (0, 2), (2, 2)]);
        assert_eq!(game.terminal(&state), Some(GameResult::Winner(Side::First)));
        assert!(game.available_moves(&state).is_empty());
    }

    #[test]
    fn test_draw() {
        let game = TicTacToe;
        // X O X / X O O / O X X
        let state = play(&[
            (0, 0), (0, 1), (0, 2), (1, 1), (1, 0), (1, 2), (2, 1), (2, 0), (2, 2),
        ]);
        assert_eq!(game.terminal(&state), Some(GameResult::Draw));
    }
}
