//! Chess with pseudo-legal move generation.
//!
//! `Side::First` is White on rows 0-1, `Side::Second` is Black on rows 6-7.
//! Moves are generated per piece without check filtering; castling and
//! en passant are not supported and pawns always promote to queens.
//!
//! Checkmate is not detected. The game ends when a king is captured, when
//! the side to move has no move at all (draw), or after fifty moves by
//! each side without a capture or pawn move (draw). `Chess::is_in_check`
//! answers attack queries for presentation layers.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Grid, Pos, Side};
use crate::games::GameId;
use crate::rules::{GameResult, RuleEngine};

const SIZE: usize = 8;
const FIFTY_MOVE_PLIES: u16 = 100;

const KNIGHT_STEPS: [(isize, isize); 8] = [
    (2, 1), (1, 2), (-1, 2), (-2, 1), (-2, -1), (-1, -2), (1, -2), (2, -1),
];
const ROOK_DIRS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const QUEEN_DIRS: [(isize, isize); 8] = [
    (1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (1, -1), (-1, 1), (-1, -1),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// FEN letter, upper-case.
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChessPiece {
    pub side: Side,
    pub kind: PieceKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChessMove {
    pub from: Pos,
    pub to: Pos,
}

/// Chess rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct Chess;

/// Chess position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChessState {
    pub board: Grid<Option<ChessPiece>>,
    pub turn: Side,
    /// Plies since the last capture or pawn move.
    pub quiet_plies: u16,
    pub result: Option<GameResult>,
}

impl ChessState {
    /// FEN-style letter at `pos`: upper-case White, lower-case Black, `.` empty.
    #[must_use]
    pub fn letter_at(&self, pos: Pos) -> char {
        match self.board.get(pos) {
            Some(Some(piece)) => {
                let letter = piece.kind.letter();
                piece.side.label((letter, letter.to_ascii_lowercase()))
            }
            _ => '.',
        }
    }

    fn king_of(&self, side: Side) -> Option<Pos> {
        self.board
            .iter()
            .find(|(_, cell)| matches!(cell, Some(p) if p.side == side && p.kind == PieceKind::King))
            .map(|(pos, _)| pos)
    }
}

fn home_row(side: Side) -> usize {
    side.label((0, SIZE - 1))
}

fn pawn_row(side: Side) -> usize {
    side.label((1, SIZE - 2))
}

fn forward(side: Side) -> isize {
    side.label((1, -1))
}

fn back_rank(side: Side, col: usize) -> Option<ChessPiece> {
    let kind = match col {
        0 | 7 => PieceKind::Rook,
        1 | 6 => PieceKind::Knight,
        2 | 5 => PieceKind::Bishop,
        3 => PieceKind::Queen,
        _ => PieceKind::King,
    };
    Some(ChessPiece { side, kind })
}

impl Chess {
    fn targets(&self, board: &Grid<Option<ChessPiece>>, from: Pos, piece: ChessPiece) -> SmallVec<[Pos; 16]> {
        let mut out = SmallVec::new();
        let side = piece.side;
        let owner = |pos: Pos| board.get(pos).copied().flatten().map(|p| p.side);

        match piece.kind {
            PieceKind::Pawn => {
                let dr = forward(side);
                if let Some(one) = board.offset(from, dr, 0) {
                    if owner(one).is_none() {
                        out.push(one);
                        if from.row == pawn_row(side) {
                            if let Some(two) = board.offset(one, dr, 0) {
                                if owner(two).is_none() {
                                    out.push(two);
                                }
                            }
                        }
                    }
                }
                for dc in [-1, 1] {
                    if let Some(diag) = board.offset(from, dr, dc) {
                        if owner(diag) == Some(side.other()) {
                            out.push(diag);
                        }
                    }
                }
            }
            PieceKind::Knight | PieceKind::King => {
                let steps: &[(isize, isize)] = if piece.kind == PieceKind::Knight {
                    &KNIGHT_STEPS
                } else {
                    &QUEEN_DIRS
                };
                for &(dr, dc) in steps {
                    if let Some(to) = board.offset(from, dr, dc) {
                        if owner(to) != Some(side) {
                            out.push(to);
                        }
                    }
                }
            }
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                let dirs: &[(isize, isize)] = match piece.kind {
                    PieceKind::Bishop => &BISHOP_DIRS,
                    PieceKind::Rook => &ROOK_DIRS,
                    _ => &QUEEN_DIRS,
                };
                for &(dr, dc) in dirs {
                    let mut cursor = from;
                    while let Some(to) = board.offset(cursor, dr, dc) {
                        match owner(to) {
                            None => out.push(to),
                            Some(s) if s != side => {
                                out.push(to);
                                break;
                            }
                            Some(_) => break,
                        }
                        cursor = to;
                    }
                }
            }
        }
        out
    }

    fn moves_for(&self, board: &Grid<Option<ChessPiece>>, side: Side) -> Vec<ChessMove> {
        let mut moves = Vec::new();
        for (from, cell) in board.iter() {
            if let Some(piece) = *cell {
                if piece.side == side {
                    moves.extend(self.targets(board, from, piece).into_iter().map(|to| ChessMove { from, to }));
                }
            }
        }
        moves
    }

    /// Whether `side`'s king is attacked by any opposing piece.
    #[must_use]
    pub fn is_in_check(&self, state: &ChessState, side: Side) -> bool {
        let Some(king) = state.king_of(side) else {
            return false;
        };
        self.moves_for(&state.board, side.other())
            .iter()
            .any(|mv| mv.to == king)
    }
}

impl RuleEngine for Chess {
    type State = ChessState;
    type Move = ChessMove;

    fn game_id(&self) -> GameId {
        GameId::Chess
    }

    fn initial_state(&self) -> ChessState {
        let board = Grid::from_fn(SIZE, SIZE, |pos| match pos.row {
            r if r == home_row(Side::First) => back_rank(Side::First, pos.col),
            r if r == pawn_row(Side::First) => Some(ChessPiece { side: Side::First, kind: PieceKind::Pawn }),
            r if r == pawn_row(Side::Second) => Some(ChessPiece { side: Side::Second, kind: PieceKind::Pawn }),
            r if r == home_row(Side::Second) => back_rank(Side::Second, pos.col),
            _ => None,
        });
        ChessState {
            board,
            turn: Side::First,
            quiet_plies: 0,
            result: None,
        }
    }

    fn turn(&self, state: &ChessState) -> Side {
        state.turn
    }

    fn available_moves(&self, state: &ChessState) -> Vec<ChessMove> {
        if state.result.is_some() {
            return vec![];
        }
        self.moves_for(&state.board, state.turn)
    }

    fn is_legal(&self, state: &ChessState, mv: &ChessMove) -> bool {
        if state.result.is_some() {
            return false;
        }
        match state.board.get(mv.from) {
            Some(Some(piece)) if piece.side == state.turn => {
                self.targets(&state.board, mv.from, *piece).contains(&mv.to)
            }
            _ => false,
        }
    }

    fn apply(&self, state: &ChessState, mv: &ChessMove) -> ChessState {
        let mover = state.turn;
        let Some(Some(mut piece)) = state.board.get(mv.from).copied() else {
            return state.clone();
        };
        let captured = state.board.get(mv.to).copied().flatten();
        let pawn_move = piece.kind == PieceKind::Pawn;

        if piece.kind == PieceKind::Pawn && mv.to.row == home_row(mover.other()) {
            piece.kind = PieceKind::Queen;
        }
        let board = state.board.set(mv.from, None).set(mv.to, Some(piece));

        let quiet_plies = if captured.is_some() || pawn_move {
            0
        } else {
            state.quiet_plies.saturating_add(1)
        };

        let result = if captured.is_some_and(|p| p.kind == PieceKind::King) {
            Some(GameResult::Winner(mover))
        } else if quiet_plies >= FIFTY_MOVE_PLIES || self.moves_for(&board, mover.other()).is_empty() {
            Some(GameResult::Draw)
        } else {
            None
        };

        ChessState {
            board,
            turn: mover.other(),
            quiet_plies,
            result,
        }
    }

    fn is_well_formed(&self, state: &ChessState) -> bool {
        state.board.has_shape(SIZE, SIZE)
    }

    fn terminal(&self, state: &ChessState) -> Option<GameResult> {
        state.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(from: (usize, usize), to: (usize, usize)) -> ChessMove {
        ChessMove {
            from: Pos::new(from.0, from.1),
            to: Pos::new(to.0, to.1),
        }
    }

    fn piece(side: Side, kind: PieceKind) -> Option<ChessPiece> {
        Some(ChessPiece { side, kind })
    }

    #[test]
    fn test_initial_position() {
        let game = Chess;
        let state = game.initial_state();
        assert_eq!(state.letter_at(Pos::new(0, 4)), 'K');
        assert_eq!(state.letter_at(Pos::new(7, 3)), 'q');
        assert_eq!(state.letter_at(Pos::new(1, 0)), 'P');
        // 16 pawn moves + 4 knight moves
        assert_eq!(game.available_moves(&state).len(), 20);
    }

    #[test]
    fn test_pawn_double_step_only_from_start() {
        let game = Chess;
        let state = game.initial_state();
        assert!(game.is_legal(&state, &mv((1, 4), (3, 4))));
        let state = game.apply(&state, &mv((1, 4), (2, 4)));
        let state = game.apply(&state, &mv((6, 0), (5, 0)));
        assert!(!game.is_legal(&state, &mv((2, 4), (4, 4))));
        assert!(game.is_legal(&state, &mv((2, 4), (3, 4))));
    }

    #[test]
    fn test_blocked_slider() {
        let game = Chess;
        let state = game.initial_state();
        assert!(!game.is_legal(&state, &mv((0, 0), (2, 0))));
        assert!(!game.is_legal(&state, &mv((0, 2), (2, 4))));
        assert!(game.is_legal(&state, &mv((0, 1), (2, 2))));
    }

    #[test]
    fn test_king_capture_ends_game() {
        let game = Chess;
        let board = Grid::new(SIZE, SIZE, None)
            .set(Pos::new(0, 0), piece(Side::First, PieceKind::Rook))
            .set(Pos::new(0, 4), piece(Side::First, PieceKind::King))
            .set(Pos::new(7, 0), piece(Side::Second, PieceKind::King));
        let state = ChessState { board, turn: Side::First, quiet_plies: 0, result: None };

        assert!(game.is_in_check(&state, Side::Second));
        assert!(!game.is_in_check(&state, Side::First));

        let next = game.apply(&state, &mv((0, 0), (7, 0)));
        assert_eq!(game.terminal(&next), Some(GameResult::Winner(Side::First)));
        assert!(game.available_moves(&next).is_empty());
    }

    #[test]
    fn test_promotion_to_queen() {
        let game = Chess;
        let board = Grid::new(SIZE, SIZE, None)
            .set(Pos::new(6, 3), piece(Side::First, PieceKind::Pawn))
            .set(Pos::new(0, 0), piece(Side::First, PieceKind::King))
            .set(Pos::new(3, 7), piece(Side::Second, PieceKind::King));
        let state = ChessState { board, turn: Side::First, quiet_plies: 0, result: None };
        let next = game.apply(&state, &mv((6, 3), (7, 3)));
        assert_eq!(next.letter_at(Pos::new(7, 3)), 'Q');
    }

    #[test]
    fn test_fifty_move_draw() {
        let game = Chess;
        let board = Grid::new(SIZE, SIZE, None)
            .set(Pos::new(0, 0), piece(Side::First, PieceKind::King))
            .set(Pos::new(7, 7), piece(Side::Second, PieceKind::King));
        let state = ChessState {
            board,
            turn: Side::First,
            quiet_plies: FIFTY_MOVE_PLIES - 1,
            result: None,
        };
        let next = game.apply(&state, &mv((0, 0), (1, 1)));
        assert_eq!(game.terminal(&next), Some(GameResult::Draw));
    }
}
