//! Checkers on an 8x8 board.
//!
//! Pieces sit on dark squares (`(row + col)` odd). `Side::First` starts on
//! rows 0-2 and moves toward row 7; `Side::Second` starts on rows 5-7 and
//! moves toward row 0. A man reaching the far row becomes a king, which
//! moves both ways.
//!
//! Simplified rules: single steps or single jumps, captures are optional,
//! and the turn passes after every move. A side with no piece or no move
//! on its turn loses.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::core::{Grid, Pos, Side};
use crate::games::GameId;
use crate::rules::{GameResult, RuleEngine};

const SIZE: usize = 8;
const START_ROWS: usize = 3;

/// A checkers piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub side: Side,
    pub king: bool,
}

/// A step or jump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckersMove {
    pub from: Pos,
    pub to: Pos,
}

impl CheckersMove {
    #[must_use]
    pub fn is_jump(&self) -> bool {
        self.from.row.abs_diff(self.to.row) == 2
    }
}

/// Checkers rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct Checkers;

/// Checkers position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckersState {
    pub board: Grid<Option<Piece>>,
    pub turn: Side,
    pub result: Option<GameResult>,
}

impl CheckersState {
    /// Number of pieces `side` has left.
    #[must_use]
    pub fn piece_count(&self, side: Side) -> usize {
        self.board.count(|cell| matches!(cell, Some(p) if p.side == side))
    }
}

fn forward(side: Side) -> isize {
    match side {
        Side::First => 1,
        Side::Second => -1,
    }
}

fn promotion_row(side: Side) -> usize {
    match side {
        Side::First => SIZE - 1,
        Side::Second => 0,
    }
}

impl Checkers {
    fn moves_from(&self, board: &Grid<Option<Piece>>, from: Pos, piece: Piece, out: &mut Vec<CheckersMove>) {
        let rows: SmallVec<[isize; 2]> = if piece.king {
            smallvec![1, -1]
        } else {
            smallvec![forward(piece.side)]
        };
        for dr in rows {
            for dc in [-1, 1] {
                let Some(step) = board.offset(from, dr, dc) else {
                    continue;
                };
                match board.get(step) {
                    Some(None) => out.push(CheckersMove { from, to: step }),
                    Some(Some(other)) if other.side != piece.side => {
                        if let Some(landing) = board.offset(step, dr, dc) {
                            if matches!(board.get(landing), Some(None)) {
                                out.push(CheckersMove { from, to: landing });
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    fn moves_for(&self, board: &Grid<Option<Piece>>, side: Side) -> Vec<CheckersMove> {
        let mut moves = Vec::new();
        for (from, cell) in board.iter() {
            if let Some(piece) = cell {
                if piece.side == side {
                    self.moves_from(board, from, *piece, &mut moves);
                }
            }
        }
        moves
    }
}

impl RuleEngine for Checkers {
    type State = CheckersState;
    type Move = CheckersMove;

    fn game_id(&self) -> GameId {
        GameId::Checkers
    }

    fn initial_state(&self) -> CheckersState {
        let board = Grid::from_fn(SIZE, SIZE, |pos| {
            if (pos.row + pos.col) % 2 == 0 {
                None
            } else if pos.row < START_ROWS {
                Some(Piece { side: Side::First, king: false })
            } else if pos.row >= SIZE - START_ROWS {
                Some(Piece { side: Side::Second, king: false })
            } else {
                None
            }
        });
        CheckersState {
            board,
            turn: Side::First,
            result: None,
        }
    }

    fn turn(&self, state: &CheckersState) -> Side {
        state.turn
    }

    fn available_moves(&self, state: &CheckersState) -> Vec<CheckersMove> {
        if state.result.is_some() {
            return vec![];
        }
        self.moves_for(&state.board, state.turn)
    }

    fn is_legal(&self, state: &CheckersState, mv: &CheckersMove) -> bool {
        if state.result.is_some() {
            return false;
        }
        match state.board.get(mv.from) {
            Some(Some(piece)) if piece.side == state.turn => {
                let mut moves = Vec::new();
                self.moves_from(&state.board, mv.from, *piece, &mut moves);
                moves.contains(mv)
            }
            _ => false,
        }
    }

    fn apply(&self, state: &CheckersState, mv: &CheckersMove) -> CheckersState {
        let mover = state.turn;
        let Some(Some(mut piece)) = state.board.get(mv.from).copied() else {
            return state.clone();
        };

        let mut board = state.board.set(mv.from, None);
        if mv.is_jump() {
            let captured = Pos::new((mv.from.row + mv.to.row) / 2, (mv.from.col + mv.to.col) / 2);
            board = board.set(captured, None);
        }
        if mv.to.row == promotion_row(mover) {
            piece.king = true;
        }
        board = board.set(mv.to, Some(piece));

        let result = self
            .moves_for(&board, mover.other())
            .is_empty()
            .then_some(GameResult::Winner(mover));

        CheckersState {
            board,
            turn: mover.other(),
            result,
        }
    }

    fn is_well_formed(&self, state: &CheckersState) -> bool {
        state.board.has_shape(SIZE, SIZE)
    }

    fn terminal(&self, state: &CheckersState) -> Option<GameResult> {
        state.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn man(side: Side) -> Option<Piece> {
        Some(Piece { side, king: false })
    }

    fn position(pieces: &[(usize, usize, Option<Piece>)], turn: Side) -> CheckersState {
        let board = pieces
            .iter()
            .fold(Grid::new(SIZE, SIZE, None), |b, &(r, c, p)| b.set(Pos::new(r, c), p));
        CheckersState { board, turn, result: None }
    }

    #[test]
    fn test_initial_position() {
        let game = Checkers;
        let state = game.initial_state();
        assert_eq!(state.piece_count(Side::First), 12);
        assert_eq!(state.piece_count(Side::Second), 12);
        // Only the front row can move: 4 pieces, 7 diagonal steps.
        assert_eq!(game.available_moves(&state).len(), 7);
    }

    #[test]
    fn test_jump_captures() {
        let game = Checkers;
        let state = position(
            &[(2, 1, man(Side::First)), (3, 2, man(Side::Second)), (6, 5, man(Side::Second))],
            Side::First,
        );
        let jump = CheckersMove { from: Pos::new(2, 1), to: Pos::new(4, 3) };
        assert!(game.is_legal(&state, &jump));

        let next = game.apply(&state, &jump);
        assert_eq!(next.board.get(Pos::new(3, 2)), Some(&None));
        assert_eq!(next.piece_count(Side::Second), 1);
        assert_eq!(next.turn, Side::Second);
    }

    #[test]
    fn test_men_cannot_move_backward() {
        let game = Checkers;
        let state = position(&[(3, 2, man(Side::First)), (7, 0, man(Side::Second))], Side::First);
        assert!(!game.is_legal(&state, &CheckersMove { from: Pos::new(3, 2), to: Pos::new(2, 1) }));
        assert!(game.is_legal(&state, &CheckersMove { from: Pos::new(3, 2), to: Pos::new(4, 1) }));
    }

    #[test]
    fn test_promotion() {
        let game = Checkers;
        let state = position(&[(6, 1, man(Side::First)), (0, 7, man(Side::Second))], Side::First);
        let next = game.apply(&state, &CheckersMove { from: Pos::new(6, 1), to: Pos::new(7, 2) });
        assert_eq!(next.board.get(Pos::new(7, 2)), Some(&Some(Piece { side: Side::First, king: true })));
    }

    #[test]
    fn test_capturing_last_piece_wins() {
        let game = Checkers;
        let state = position(&[(2, 1, man(Side::First)), (3, 2, man(Side::Second))], Side::First);
        let next = game.apply(&state, &CheckersMove { from: Pos::new(2, 1), to: Pos::new(4, 3) });
        assert_eq!(game.terminal(&next), Some(GameResult::Winner(Side::First)));
        assert!(game.available_moves(&next).is_empty());
    }

    #[test]
    fn test_opponent_piece_cannot_be_moved() {
        let game = Checkers;
        let state = game.initial_state();
        assert!(!game.is_legal(&state, &CheckersMove { from: Pos::new(5, 0), to: Pos::new(4, 1) }));
    }
}
