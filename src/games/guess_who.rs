//! Guess-Who: each side holds a secret character and narrows down the
//! opponent's by asking yes/no questions about facial features.
//!
//! A question removes every candidate on the asker's board that answers
//! differently from the opponent's secret. Naming a character ends the
//! game: a right guess wins, a wrong guess loses.

use serde::{Deserialize, Serialize};

use crate::core::{GameRng, Side, SideMap};
use crate::games::GameId;
use crate::rules::{GameResult, RuleEngine};

/// A yes/no question topic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Glasses,
    Hat,
    Beard,
    Moustache,
    Bald,
    BlondeHair,
    BrownHair,
    BlackHair,
    RedHair,
    WhiteHair,
    BlueEyes,
    Female,
    BigNose,
    RosyCheeks,
}

impl Feature {
    pub const ALL: [Feature; 14] = [
        Feature::Glasses,
        Feature::Hat,
        Feature::Beard,
        Feature::Moustache,
        Feature::Bald,
        Feature::BlondeHair,
        Feature::BrownHair,
        Feature::BlackHair,
        Feature::RedHair,
        Feature::WhiteHair,
        Feature::BlueEyes,
        Feature::Female,
        Feature::BigNose,
        Feature::RosyCheeks,
    ];

    const fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// A face on the board.
#[derive(Clone, Copy, Debug)]
pub struct Character {
    pub name: &'static str,
    features: u16,
}

impl Character {
    const fn new(name: &'static str, features: &[Feature]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < features.len() {
            bits |= features[i].bit();
            i += 1;
        }
        Self { name, features: bits }
    }

    /// Whether this character has `feature`.
    #[must_use]
    pub fn has(&self, feature: Feature) -> bool {
        self.features & feature.bit() != 0
    }
}

use Feature::*;

pub const CHARACTERS: [Character; 16] = [
    Character::new("Alex", &[Moustache, BlackHair]),
    Character::new("Alfred", &[Moustache, RedHair, BlueEyes]),
    Character::new("Anita", &[Female, BlondeHair, BlueEyes, RosyCheeks]),
    Character::new("Anne", &[Female, BlackHair, BigNose]),
    Character::new("Bernard", &[Hat, BrownHair, BigNose]),
    Character::new("Bill", &[Bald, Beard, RedHair, RosyCheeks]),
    Character::new("Charles", &[Moustache, BlondeHair]),
    Character::new("Claire", &[Female, Glasses, Hat, RedHair]),
    Character::new("David", &[Beard, BlondeHair]),
    Character::new("Eric", &[Hat, BlondeHair]),
    Character::new("Frans", &[RedHair]),
    Character::new("George", &[Hat, WhiteHair]),
    Character::new("Herman", &[Bald, RedHair, BigNose]),
    Character::new("Joe", &[Glasses, BlondeHair]),
    Character::new("Maria", &[Female, Hat, BrownHair]),
    Character::new("Max", &[Moustache, BlackHair, BigNose]),
];

const ALL_CANDIDATES: u32 = (1 << CHARACTERS.len()) - 1;

/// A Guess-Who move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuessWhoMove {
    /// "Does your character have ...?"
    Ask(Feature),
    /// Name the opponent's character by index into `CHARACTERS`.
    Guess(u8),
}

/// Guess-Who rules with fixed secrets.
#[derive(Clone, Copy, Debug)]
pub struct GuessWho {
    secrets: SideMap<u8>,
}

impl Default for GuessWho {
    fn default() -> Self {
        Self::new(0, 1)
    }
}

/// Guess-Who position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessWhoState {
    /// Each side's secret character.
    pub secrets: SideMap<u8>,
    /// Bit `i` set while `CHARACTERS[i]` is still standing on that side's board.
    pub candidates: SideMap<u32>,
    /// Features each side has already asked about.
    pub asked: SideMap<u16>,
    pub turn: Side,
    pub result: Option<GameResult>,
}

impl GuessWhoState {
    /// Indices of characters still standing on `side`'s board.
    #[must_use]
    pub fn remaining(&self, side: Side) -> Vec<u8> {
        (0..CHARACTERS.len() as u8)
            .filter(|i| self.candidates[side] & (1 << i) != 0)
            .collect()
    }
}

impl GuessWho {
    /// Game with the given secret character indices (wrapped into range).
    #[must_use]
    pub fn new(first_secret: u8, second_secret: u8) -> Self {
        let n = CHARACTERS.len() as u8;
        Self {
            secrets: SideMap::new(first_secret % n, second_secret % n),
        }
    }

    /// Game with secrets drawn at random.
    #[must_use]
    pub fn random(rng: &mut GameRng) -> Self {
        let n = CHARACTERS.len();
        Self::new(rng.gen_range_usize(0..n) as u8, rng.gen_range_usize(0..n) as u8)
    }
}

impl RuleEngine for GuessWho {
    type State = GuessWhoState;
    type Move = GuessWhoMove;

    fn game_id(&self) -> GameId {
        GameId::GuessWho
    }

    fn initial_state(&self) -> GuessWhoState {
        GuessWhoState {
            secrets: self.secrets,
            candidates: SideMap::with_value(ALL_CANDIDATES),
            asked: SideMap::with_value(0),
            turn: Side::First,
            result: None,
        }
    }

    fn turn(&self, state: &GuessWhoState) -> Side {
        state.turn
    }

    /// Unasked questions in `Feature::ALL` order, then guesses at every
    /// remaining candidate.
    fn available_moves(&self, state: &GuessWhoState) -> Vec<GuessWhoMove> {
        if state.result.is_some() {
            return vec![];
        }
        let side = state.turn;
        let questions = Feature::ALL
            .into_iter()
            .filter(|f| state.asked[side] & f.bit() == 0)
            .map(GuessWhoMove::Ask);
        let guesses = state.remaining(side).into_iter().map(GuessWhoMove::Guess);
        questions.chain(guesses).collect()
    }

    fn apply(&self, state: &GuessWhoState, mv: &GuessWhoMove) -> GuessWhoState {
        let mover = state.turn;
        let mut next = state.clone();
        match *mv {
            GuessWhoMove::Ask(feature) => {
                // An unknown secret answers "no" to everything.
                let answer = CHARACTERS
                    .get(usize::from(state.secrets[mover.other()]))
                    .is_some_and(|c| c.has(feature));
                let keep = CHARACTERS
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.has(feature) == answer)
                    .fold(0u32, |mask, (i, _)| mask | (1 << i));
                next.candidates[mover] &= keep;
                next.asked[mover] |= feature.bit();
            }
            GuessWhoMove::Guess(index) => {
                next.result = Some(if index == state.secrets[mover.other()] {
                    GameResult::Winner(mover)
                } else {
                    GameResult::Winner(mover.other())
                });
            }
        }
        next.turn = mover.other();
        next
    }

    fn is_well_formed(&self, state: &GuessWhoState) -> bool {
        state.secrets.iter().all(|(_, s)| usize::from(*s) < CHARACTERS.len())
            && state.candidates.iter().all(|(_, c)| *c & !ALL_CANDIDATES == 0)
    }

    fn terminal(&self, state: &GuessWhoState) -> Option<GameResult> {
        state.result
    }
}
