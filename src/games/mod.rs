//! Game variants.
//!
//! Each variant is a separate `RuleEngine` implementation in its own
//! module. `GameId` names a variant on the wire and in room keys, and
//! `AnyGame` selects one at runtime behind the same contract.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::core::Side;
use crate::rules::{GameResult, RuleEngine};

pub mod checkers;
pub mod chess;
pub mod connect_four;
pub mod dots_and_boxes;
pub mod gomoku;
pub mod guess_who;
pub mod hangman;
pub mod ludo;
pub mod nine_holes;
pub mod tictactoe;

pub use checkers::{Checkers, CheckersMove, CheckersState};
pub use chess::{Chess, ChessMove, ChessState};
pub use connect_four::{ConnectFour, ConnectFourState};
pub use dots_and_boxes::{DotsAndBoxes, DotsAndBoxesState, Edge};
pub use gomoku::{Gomoku, GomokuState};
pub use guess_who::{GuessWho, GuessWhoMove, GuessWhoState};
pub use hangman::{Hangman, HangmanState};
pub use ludo::{Ludo, LudoMove, LudoState};
pub use nine_holes::{NineHoles, NineHolesMove, NineHolesState};
pub use tictactoe::{TicTacToe, TicTacToeState};

use crate::core::Pos;

/// Game discriminator carried in room keys and state updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameId {
    #[serde(rename = "tictactoe")]
    TicTacToe,
    ConnectFour,
    Checkers,
    Chess,
    Gomoku,
    DotsAndBoxes,
    Hangman,
    NineHoles,
    GuessWho,
    Ludo,
}

impl GameId {
    pub const ALL: [GameId; 10] = [
        GameId::TicTacToe,
        GameId::ConnectFour,
        GameId::Checkers,
        GameId::Chess,
        GameId::Gomoku,
        GameId::DotsAndBoxes,
        GameId::Hangman,
        GameId::NineHoles,
        GameId::GuessWho,
        GameId::Ludo,
    ];

    /// Wire name, matching the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            GameId::TicTacToe => "tictactoe",
            GameId::ConnectFour => "connect-four",
            GameId::Checkers => "checkers",
            GameId::Chess => "chess",
            GameId::Gomoku => "gomoku",
            GameId::DotsAndBoxes => "dots-and-boxes",
            GameId::Hangman => "hangman",
            GameId::NineHoles => "nine-holes",
            GameId::GuessWho => "guess-who",
            GameId::Ludo => "ludo",
        }
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A game name that matches no variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown game: {0}")]
pub struct UnknownGame(pub String);

impl FromStr for GameId {
    type Err = UnknownGame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownGame(s.to_string()))
    }
}

// =============================================================================
// Runtime dispatch
// =============================================================================

macro_rules! any_game {
    ($($variant:ident($engine:ty, $state:ty, $mv:ty)),* $(,)?) => {
        /// One of the variant engines, selected at runtime.
        #[derive(Clone, Debug)]
        pub enum AnyGame {
            $($variant($engine)),*
        }

        /// A position of whichever variant.
        #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
        pub enum AnyState {
            $($variant($state)),*
        }

        /// A move of whichever variant.
        #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
        pub enum AnyMove {
            $($variant($mv)),*
        }

        $(
            impl From<$engine> for AnyGame {
                fn from(engine: $engine) -> Self {
                    AnyGame::$variant(engine)
                }
            }
        )*

        impl AnyState {
            #[must_use]
            pub fn game_id(&self) -> GameId {
                match self {
                    $(AnyState::$variant(_) => GameId::$variant),*
                }
            }

            /// The side to move.
            #[must_use]
            pub fn turn(&self) -> Side {
                match self {
                    $(AnyState::$variant(s) => s.turn),*
                }
            }

            #[must_use]
            pub fn result(&self) -> Option<GameResult> {
                match self {
                    $(AnyState::$variant(s) => s.result),*
                }
            }
        }

        impl AnyMove {
            #[must_use]
            pub fn game_id(&self) -> GameId {
                match self {
                    $(AnyMove::$variant(_) => GameId::$variant),*
                }
            }
        }

        impl RuleEngine for AnyGame {
            type State = AnyState;
            type Move = AnyMove;

            fn game_id(&self) -> GameId {
                match self {
                    $(AnyGame::$variant(_) => GameId::$variant),*
                }
            }

            fn initial_state(&self) -> AnyState {
                match self {
                    $(AnyGame::$variant(g) => AnyState::$variant(g.initial_state())),*
                }
            }

            fn turn(&self, state: &AnyState) -> Side {
                state.turn()
            }

            fn available_moves(&self, state: &AnyState) -> Vec<AnyMove> {
                match (self, state) {
                    $((AnyGame::$variant(g), AnyState::$variant(s)) => {
                        g.available_moves(s).into_iter().map(AnyMove::$variant).collect()
                    })*
                    _ => vec![],
                }
            }

            fn is_legal(&self, state: &AnyState, mv: &AnyMove) -> bool {
                match (self, state, mv) {
                    $((AnyGame::$variant(g), AnyState::$variant(s), AnyMove::$variant(m)) => g.is_legal(s, m),)*
                    _ => false,
                }
            }

            /// Mismatched variants leave the state unchanged.
            fn apply(&self, state: &AnyState, mv: &AnyMove) -> AnyState {
                match (self, state, mv) {
                    $((AnyGame::$variant(g), AnyState::$variant(s), AnyMove::$variant(m)) => {
                        AnyState::$variant(g.apply(s, m))
                    })*
                    _ => state.clone(),
                }
            }

            /// A state of another variant is never well formed.
            fn is_well_formed(&self, state: &AnyState) -> bool {
                match (self, state) {
                    $((AnyGame::$variant(g), AnyState::$variant(s)) => g.is_well_formed(s),)*
                    _ => false,
                }
            }

            fn terminal(&self, state: &AnyState) -> Option<GameResult> {
                state.result()
            }
        }
    };
}

any_game! {
    TicTacToe(TicTacToe, TicTacToeState, Pos),
    ConnectFour(ConnectFour, ConnectFourState, usize),
    Checkers(Checkers, CheckersState, CheckersMove),
    Chess(Chess, ChessState, ChessMove),
    Gomoku(Gomoku, GomokuState, Pos),
    DotsAndBoxes(DotsAndBoxes, DotsAndBoxesState, Edge),
    Hangman(Hangman, HangmanState, char),
    NineHoles(NineHoles, NineHolesState, NineHolesMove),
    GuessWho(GuessWho, GuessWhoState, GuessWhoMove),
    Ludo(Ludo, LudoState, LudoMove),
}

impl AnyGame {
    /// Engine for `id` with default configuration.
    #[must_use]
    pub fn new(id: GameId) -> Self {
        match id {
            GameId::TicTacToe => TicTacToe.into(),
            GameId::ConnectFour => ConnectFour.into(),
            GameId::Checkers => Checkers.into(),
            GameId::Chess => Chess.into(),
            GameId::Gomoku => Gomoku::default().into(),
            GameId::DotsAndBoxes => DotsAndBoxes::default().into(),
            GameId::Hangman => Hangman::default().into(),
            GameId::NineHoles => NineHoles.into(),
            GameId::GuessWho => GuessWho::default().into(),
            GameId::Ludo => Ludo.into(),
        }
    }

    /// Engine for `id`, drawing hidden setup (secret word, secret
    /// characters) from `rng`.
    #[must_use]
    pub fn with_rng(id: GameId, rng: &mut crate::core::GameRng) -> Self {
        match id {
            GameId::Hangman => Hangman::random(rng).into(),
            GameId::GuessWho => GuessWho::random(rng).into(),
            other => Self::new(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_id_round_trip() {
        for id in GameId::ALL {
            assert_eq!(id.as_str().parse::<GameId>(), Ok(id));
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
        assert!("poker".parse::<GameId>().is_err());
    }

    #[test]
    fn test_any_game_dispatch() {
        for id in GameId::ALL {
            let game = AnyGame::new(id);
            let state = game.initial_state();
            assert_eq!(game.game_id(), id);
            assert_eq!(state.game_id(), id);
            assert_eq!(game.turn(&state), Side::First);
            assert_eq!(game.terminal(&state), None);
            assert!(!game.available_moves(&state).is_empty());
        }
    }

    #[test]
    fn test_mismatched_move_is_illegal() {
        let game = AnyGame::new(GameId::TicTacToe);
        let state = game.initial_state();
        let mv = AnyMove::ConnectFour(3);
        assert!(!game.is_legal(&state, &mv));
        assert_eq!(game.apply(&state, &mv), state);
        assert!(game.try_apply(&state, &mv).is_none());
    }

    #[test]
    fn test_any_game_plays_tictactoe() {
        let game = AnyGame::new(GameId::TicTacToe);
        let state = game.initial_state();
        let mv = AnyMove::TicTacToe(Pos::new(1, 1));
        let next = game.try_apply(&state, &mv).unwrap();
        assert_eq!(next.turn(), Side::Second);
        assert_eq!(game.available_moves(&next).len(), 8);
    }
}
