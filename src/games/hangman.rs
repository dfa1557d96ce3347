//! Hangman for two guessers.
//!
//! Both sides take turns guessing letters of one hidden word and share a
//! budget of wrong guesses. The side whose guess reveals the last letter
//! wins; the side whose wrong guess exhausts the budget loses.

use serde::{Deserialize, Serialize};

use crate::core::{GameRng, Side};
use crate::games::GameId;
use crate::rules::{GameResult, RuleEngine};

pub const DEFAULT_MAX_WRONG: u8 = 6;

const WORDS: &[&str] = &[
    "RUST", "BOARD", "CHESS", "KNIGHT", "BISHOP", "CASTLE", "DOMINO", "PUZZLE",
    "LADDER", "MARBLE", "TROPHY", "PLAYER", "GAMBIT", "SQUARE", "TOKEN", "CHECKER",
];

/// Hangman rules around one secret word.
#[derive(Clone, Debug)]
pub struct Hangman {
    word: String,
    max_wrong: u8,
}

impl Default for Hangman {
    fn default() -> Self {
        Self::new(WORDS[0])
    }
}

/// Hangman position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HangmanState {
    pub word: String,
    /// Bit `n` set when letter `'A' + n` has been guessed.
    pub guessed: u32,
    pub wrong: u8,
    pub max_wrong: u8,
    pub turn: Side,
    pub result: Option<GameResult>,
}

fn letter_bit(letter: char) -> Option<u32> {
    letter
        .is_ascii_uppercase()
        .then(|| 1u32 << (letter as u32 - 'A' as u32))
}

impl HangmanState {
    /// Whether `letter` has already been guessed.
    #[must_use]
    pub fn is_guessed(&self, letter: char) -> bool {
        letter_bit(letter).is_some_and(|bit| self.guessed & bit != 0)
    }

    /// Whether every letter of the word has been revealed.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.word.chars().all(|c| self.is_guessed(c))
    }

    /// The word with unguessed letters replaced by `_`, space separated.
    #[must_use]
    pub fn masked_word(&self) -> String {
        self.word
            .chars()
            .map(|c| if self.is_guessed(c) { c } else { '_' })
            .map(String::from)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Hangman {
    /// Game around `word`. Non-letters are dropped, letters upper-cased.
    #[must_use]
    pub fn new(word: &str) -> Self {
        let word: String = word
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_uppercase())
            .collect();
        let word = if word.is_empty() { WORDS[0].to_string() } else { word };
        Self {
            word,
            max_wrong: DEFAULT_MAX_WRONG,
        }
    }

    /// Game around a word drawn from the built-in list.
    #[must_use]
    pub fn random(rng: &mut GameRng) -> Self {
        let word = rng.choose(WORDS).copied().unwrap_or(WORDS[0]);
        Self::new(word)
    }

    /// Override the shared wrong-guess budget (at least 1).
    #[must_use]
    pub fn with_max_wrong(mut self, max_wrong: u8) -> Self {
        self.max_wrong = max_wrong.max(1);
        self
    }

    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }
}

impl RuleEngine for Hangman {
    type State = HangmanState;
    /// An upper-case letter.
    type Move = char;

    fn game_id(&self) -> GameId {
        GameId::Hangman
    }

    fn initial_state(&self) -> HangmanState {
        HangmanState {
            word: self.word.clone(),
            guessed: 0,
            wrong: 0,
            max_wrong: self.max_wrong,
            turn: Side::First,
            result: None,
        }
    }

    fn turn(&self, state: &HangmanState) -> Side {
        state.turn
    }

    /// Unguessed letters in alphabetical order.
    fn available_moves(&self, state: &HangmanState) -> Vec<char> {
        if state.result.is_some() {
            return vec![];
        }
        ('A'..='Z').filter(|c| !state.is_guessed(*c)).collect()
    }

    fn is_legal(&self, state: &HangmanState, mv: &char) -> bool {
        state.result.is_none() && letter_bit(*mv).is_some() && !state.is_guessed(*mv)
    }

    fn apply(&self, state: &HangmanState, mv: &char) -> HangmanState {
        let mover = state.turn;
        let mut next = state.clone();
        next.guessed |= letter_bit(*mv).unwrap_or(0);
        if !state.word.contains(*mv) {
            next.wrong = next.wrong.saturating_add(1);
        }

        next.result = if next.is_revealed() {
            Some(GameResult::Winner(mover))
        } else if next.wrong >= next.max_wrong {
            Some(GameResult::Winner(mover.other()))
        } else {
            None
        };
        next.turn = mover.other();
        next
    }

    fn is_well_formed(&self, state: &HangmanState) -> bool {
        !state.word.is_empty()
            && state.word.chars().all(|c| c.is_ascii_uppercase())
            && state.max_wrong >= 1
            && state.wrong <= state.max_wrong
    }

    fn terminal(&self, state: &HangmanState) -> Option<GameResult> {
        state.result
    }
}
