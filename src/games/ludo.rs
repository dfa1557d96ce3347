//! Two-seat Ludo.
//!
//! Each side races four tokens around a 52-square shared track and up a
//! five-square home column. Token progress is stored relative to the
//! owner's start square:
//!
//! | progress | meaning                       |
//! |----------|-------------------------------|
//! | 0        | in the yard                   |
//! | 1..=51   | on the shared track           |
//! | 52..=56  | in the owner's home column    |
//! | 57       | finished                      |
//!
//! A token leaves the yard only on a 6 and must finish on an exact roll.
//! Landing on an opposing token sends it back to the yard unless the square
//! is a start square. The die is part of the move: `available_moves`
//! enumerates every roll, so a caller (or strategy) picks the roll first.

use serde::{Deserialize, Serialize};

use crate::core::{Side, SideMap};
use crate::games::GameId;
use crate::rules::{GameResult, RuleEngine};

pub const TOKENS: usize = 4;
pub const TRACK_LEN: u8 = 52;
pub const LAST_TRACK: u8 = 51;
pub const FINISHED: u8 = 57;
const EXIT_ROLL: u8 = 6;

/// A die roll and the token it moves. `token: None` passes the roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LudoMove {
    pub roll: u8,
    pub token: Option<u8>,
}

/// Ludo rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ludo;

/// Ludo position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LudoState {
    pub tokens: SideMap<[u8; TOKENS]>,
    pub turn: Side,
    pub result: Option<GameResult>,
}

impl LudoState {
    /// Tokens `side` has brought home.
    #[must_use]
    pub fn finished(&self, side: Side) -> usize {
        self.tokens[side].iter().filter(|p| **p == FINISHED).count()
    }
}

fn start_square(side: Side) -> u8 {
    side.label((0, TRACK_LEN / 2))
}

/// Absolute track square for a token at `progress`, if it is on the track.
#[must_use]
pub fn square_of(side: Side, progress: u8) -> Option<u8> {
    (1..=LAST_TRACK)
        .contains(&progress)
        .then(|| (start_square(side) + progress - 1) % TRACK_LEN)
}

/// Start squares are safe from capture.
#[must_use]
pub fn is_safe(square: u8) -> bool {
    Side::BOTH.iter().any(|s| start_square(*s) == square)
}

fn advance(progress: u8, roll: u8) -> Option<u8> {
    match progress {
        0 => (roll == EXIT_ROLL).then_some(1),
        FINISHED => None,
        p => p.checked_add(roll).filter(|n| *n <= FINISHED),
    }
}

impl Ludo {
    /// Progress of the moved token after `mv`, if the move is a real one.
    fn landing(&self, state: &LudoState, mv: &LudoMove) -> Option<u8> {
        let token = usize::from(mv.token?);
        let progress = *state.tokens[state.turn].get(token)?;
        advance(progress, mv.roll)
    }

    /// Whether `mv` sends an opposing token back to the yard.
    #[must_use]
    pub fn captures(&self, state: &LudoState, mv: &LudoMove) -> bool {
        let side = state.turn;
        let Some(square) = self.landing(state, mv).and_then(|p| square_of(side, p)) else {
            return false;
        };
        !is_safe(square)
            && state.tokens[side.other()]
                .iter()
                .any(|p| square_of(side.other(), *p) == Some(square))
    }

    /// Whether `mv` brings a token home.
    #[must_use]
    pub fn finishes(&self, state: &LudoState, mv: &LudoMove) -> bool {
        self.landing(state, mv) == Some(FINISHED)
    }

    /// Whether the token moved by `mv` lands within one roll ahead of an
    /// opposing token on an unsafe square.
    #[must_use]
    pub fn lands_in_reach(&self, state: &LudoState, mv: &LudoMove) -> bool {
        let side = state.turn;
        let Some(square) = self.landing(state, mv).and_then(|p| square_of(side, p)) else {
            return false;
        };
        if is_safe(square) {
            return false;
        }
        state.tokens[side.other()].iter().any(|&p| {
            square_of(side.other(), p).is_some_and(|theirs| {
                let distance = (square + TRACK_LEN - theirs) % TRACK_LEN;
                (1..=EXIT_ROLL).contains(&distance) && p + distance <= LAST_TRACK
            })
        })
    }
}

impl RuleEngine for Ludo {
    type State = LudoState;
    type Move = LudoMove;

    fn game_id(&self) -> GameId {
        GameId::Ludo
    }

    fn initial_state(&self) -> LudoState {
        LudoState {
            tokens: SideMap::with_value([0; TOKENS]),
            turn: Side::First,
            result: None,
        }
    }

    fn turn(&self, state: &LudoState) -> Side {
        state.turn
    }

    /// For each roll 1..=6, every token that can move, or a pass when none can.
    fn available_moves(&self, state: &LudoState) -> Vec<LudoMove> {
        if state.result.is_some() {
            return vec![];
        }
        let tokens = state.tokens[state.turn];
        let mut moves = Vec::new();
        for roll in 1..=EXIT_ROLL {
            let before = moves.len();
            for (i, progress) in tokens.iter().enumerate() {
                if advance(*progress, roll).is_some() {
                    moves.push(LudoMove { roll, token: Some(i as u8) });
                }
            }
            if moves.len() == before {
                moves.push(LudoMove { roll, token: None });
            }
        }
        moves
    }

    fn apply(&self, state: &LudoState, mv: &LudoMove) -> LudoState {
        let mover = state.turn;
        let mut next = state.clone();
        next.turn = mover.other();

        let (Some(token), Some(progress)) = (mv.token, self.landing(state, mv)) else {
            return next;
        };
        let capture = self.captures(state, mv);
        next.tokens[mover][usize::from(token)] = progress;

        if capture {
            if let Some(square) = square_of(mover, progress) {
                for p in next.tokens[mover.other()].iter_mut() {
                    if square_of(mover.other(), *p) == Some(square) {
                        *p = 0;
                    }
                }
            }
        }

        if next.finished(mover) == TOKENS {
            next.result = Some(GameResult::Winner(mover));
        }
        next
    }

    fn is_well_formed(&self, state: &LudoState) -> bool {
        state.tokens.iter().all(|(_, tokens)| tokens.iter().all(|p| *p <= FINISHED))
    }

    fn terminal(&self, state: &LudoState) -> Option<GameResult> {
        state.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with(first: [u8; TOKENS], second: [u8; TOKENS], turn: Side) -> LudoState {
        LudoState {
            tokens: SideMap::new(first, second),
            turn,
            result: None,
        }
    }

    #[test]
    fn test_only_six_leaves_yard() {
        let game = Ludo;
        let moves = game.available_moves(&game.initial_state());
        // Rolls 1-5 pass, roll 6 can move any of four tokens.
        assert_eq!(moves.len(), 5 + TOKENS);
        assert!(moves.contains(&LudoMove { roll: 3, token: None }));
        assert!(moves.contains(&LudoMove { roll: 6, token: Some(2) }));
        assert!(!moves.contains(&LudoMove { roll: 3, token: Some(0) }));
    }

    #[test]
    fn test_out_of_range_progress_cannot_move() {
        let game = Ludo;
        let state = state_with([255, 0, 0, 0], [0; TOKENS], Side::First);
        assert!(!game.is_well_formed(&state));
        let moves = game.available_moves(&state);
        assert!(moves.iter().all(|mv| mv.token != Some(0)));
        let next = game.apply(&state, &LudoMove { roll: 6, token: Some(0) });
        assert_eq!(next.tokens[Side::First][0], 255);
        assert!(game.is_well_formed(&game.initial_state()));
    }

    #[test]
    fn test_pass_flips_turn() {
        let game = Ludo;
        let state = game.apply(&game.initial_state(), &LudoMove { roll: 2, token: None });
        assert_eq!(state.turn, Side::Second);
        assert_eq!(state.tokens, game.initial_state().tokens);
    }

    #[test]
    fn test_square_mapping() {
        assert_eq!(square_of(Side::First, 1), Some(0));
        assert_eq!(square_of(Side::Second, 1), Some(26));
        assert_eq!(square_of(Side::Second, 30), Some(3));
        assert_eq!(square_of(Side::First, 0), None);
        assert_eq!(square_of(Side::First, 52), None);
    }

    #[test]
    fn test_capture_sends_home() {
        let game = Ludo;
        // First at square 4 (progress 5); Second at square 7 (progress 34).
        let state = state_with([5, 0, 0, 0], [34, 0, 0, 0], Side::First);
        let mv = LudoMove { roll: 3, token: Some(0) };
        assert!(game.captures(&state, &mv));

        let next = game.apply(&state, &mv);
        assert_eq!(next.tokens[Side::First][0], 8);
        assert_eq!(next.tokens[Side::Second][0], 0);
    }

    #[test]
    fn test_start_square_is_safe() {
        let game = Ludo;
        // Second's token sits on its own start (square 26); First lands there.
        let state = state_with([22, 0, 0, 0], [1, 0, 0, 0], Side::First);
        let mv = LudoMove { roll: 5, token: Some(0) };
        assert!(!game.captures(&state, &mv));
        let next = game.apply(&state, &mv);
        assert_eq!(next.tokens[Side::Second][0], 1);
    }

    #[test]
    fn test_exact_roll_to_finish() {
        let game = Ludo;
        let state = state_with([55, FINISHED, FINISHED, FINISHED], [0; TOKENS], Side::First);
        assert!(!game.is_legal(&state, &LudoMove { roll: 3, token: Some(0) }));
        let mv = LudoMove { roll: 2, token: Some(0) };
        assert!(game.finishes(&state, &mv));

        let next = game.apply(&state, &mv);
        assert_eq!(game.terminal(&next), Some(GameResult::Winner(Side::First)));
        assert!(game.available_moves(&next).is_empty());
    }

    #[test]
    fn test_lands_in_reach() {
        let game = Ludo;
        // Second's token at square 30 (progress 5); First lands on square 33.
        let state = state_with([30, 0, 0, 0], [5, 0, 0, 0], Side::First);
        assert!(game.lands_in_reach(&state, &LudoMove { roll: 4, token: Some(0) }));
        assert!(!game.lands_in_reach(&state, &LudoMove { roll: 1, token: Some(0) }));
    }
}
