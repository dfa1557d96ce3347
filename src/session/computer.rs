//! Local play against a computer opponent.
//!
//! `ComputerMatch` holds one game with a human seat and a computer seat.
//! The human's moves are checked for legality; the computer's moves come
//! from a `Strategy` and are applied as proposed. Pacing belongs to the
//! caller: `move_delay` says how long to wait before showing a computer
//! move, and nothing in here sleeps.

use log::{debug, info};
use std::time::Duration;

use crate::core::{GameRng, Side};
use crate::games::{AnyGame, GameId};
use crate::rules::{GameResult, RuleEngine};
use crate::strategy::{Strategy, StrategyConfig, StrategyKind};

/// A game between a human seat and a computer seat.
#[derive(Debug, Clone)]
pub struct ComputerMatch<E: RuleEngine, S: Strategy<E>> {
    engine: E,
    strategy: S,
    human: Side,
    state: E::State,
    rng: GameRng,
    move_delay: Duration,
}

impl ComputerMatch<AnyGame, StrategyKind> {
    /// Match of `game` using the strategy `config` assigns to it.
    ///
    /// Random setup (Hangman words, Guess-Who secrets) and the opponent's
    /// random choices both come from `config.seed`.
    pub fn for_game(game: GameId, human: Side, config: &StrategyConfig) -> Self {
        let mut rng = GameRng::new(config.seed);
        let engine = AnyGame::with_rng(game, &mut rng);
        let strategy = config.strategy_for(game);
        info!("{game}: human plays {human:?} against {strategy:?}");
        Self::new(engine, strategy, human, config).with_rng(rng)
    }
}

impl<E: RuleEngine, S: Strategy<E>> ComputerMatch<E, S> {
    pub fn new(engine: E, strategy: S, human: Side, config: &StrategyConfig) -> Self {
        let state = engine.initial_state();
        Self {
            engine,
            strategy,
            human,
            state,
            rng: GameRng::new(config.seed),
            move_delay: config.move_delay,
        }
    }

    #[must_use]
    pub fn with_rng(mut self, rng: GameRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn state(&self) -> &E::State {
        &self.state
    }

    pub fn human_side(&self) -> Side {
        self.human
    }

    pub fn computer_side(&self) -> Side {
        self.human.other()
    }

    /// Pause the caller should take before showing a computer move.
    pub fn move_delay(&self) -> Duration {
        self.move_delay
    }

    pub fn result(&self) -> Option<GameResult> {
        self.engine.terminal(&self.state)
    }

    /// Whether the computer is the side to move.
    pub fn computer_to_move(&self) -> bool {
        self.result().is_none() && self.engine.turn(&self.state) == self.computer_side()
    }

    /// Apply a human move. Returns false, leaving the state untouched, when
    /// it is not the human's turn or the move is illegal.
    pub fn human_move(&mut self, mv: &E::Move) -> bool {
        if self.engine.turn(&self.state) != self.human {
            return false;
        }
        match self.engine.try_apply(&self.state, mv) {
            Some(next) => {
                self.state = next;
                true
            }
            None => false,
        }
    }

    /// Let the computer choose and apply one move.
    ///
    /// Returns the move played, or `None` when it is not the computer's
    /// turn or the strategy finds nothing.
    pub fn computer_move(&mut self) -> Option<E::Move> {
        if !self.computer_to_move() {
            return None;
        }
        let side = self.computer_side();
        let mv = self
            .strategy
            .select_move(&self.engine, &self.state, side, &mut self.rng)?;
        debug!("computer plays {mv:?}");
        self.state = self.engine.apply(&self.state, &mv);
        Some(mv)
    }

    /// Start the game over.
    pub fn replay(&mut self) {
        self.state = self.engine.initial_state();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Pos;
    use crate::games::{AnyMove, TicTacToe};
    use crate::strategy::UniformRandom;

    #[test]
    fn test_human_then_computer() {
        let config = StrategyConfig::default();
        let mut game = ComputerMatch::new(TicTacToe, UniformRandom, Side::First, &config);

        assert!(!game.computer_to_move());
        assert!(game.computer_move().is_none());
        assert!(game.human_move(&Pos::new(1, 1)));
        assert!(!game.human_move(&Pos::new(0, 0)));

        assert!(game.computer_to_move());
        let reply = game.computer_move().unwrap();
        assert_ne!(reply, Pos::new(1, 1));
        assert_eq!(game.engine().turn(game.state()), Side::First);
    }

    #[test]
    fn test_illegal_human_move_rejected() {
        let config = StrategyConfig::default();
        let mut game = ComputerMatch::new(TicTacToe, UniformRandom, Side::First, &config);
        assert!(!game.human_move(&Pos::new(5, 5)));
        assert_eq!(game.state(), &TicTacToe.initial_state());
    }

    #[test]
    fn test_computer_opens_when_human_is_second() {
        let config = StrategyConfig::default();
        let mut game = ComputerMatch::for_game(GameId::ConnectFour, Side::Second, &config);
        assert!(game.computer_to_move());
        assert!(matches!(game.computer_move(), Some(AnyMove::ConnectFour(_))));
        assert!(!game.computer_to_move());
    }

    #[test]
    fn test_computer_plays_out_every_game() {
        let config = StrategyConfig::default().with_depth(2);
        for id in GameId::ALL {
            let mut game = ComputerMatch::for_game(id, Side::First, &config);
            let mut rng = GameRng::new(9);
            for _ in 0..400 {
                if game.result().is_some() {
                    break;
                }
                if game.computer_to_move() {
                    assert!(game.computer_move().is_some(), "{id}: computer stuck");
                } else {
                    let moves = game.engine().available_moves(game.state());
                    let mv = rng.choose(&moves).unwrap().clone();
                    assert!(game.human_move(&mv), "{id}: offered move rejected");
                }
            }
        }
    }

    #[test]
    fn test_replay_and_delay() {
        let config = StrategyConfig::default().with_move_delay(Duration::from_millis(5));
        let mut game = ComputerMatch::for_game(GameId::TicTacToe, Side::First, &config);
        assert_eq!(game.move_delay(), Duration::from_millis(5));
        assert!(game.human_move(&AnyMove::TicTacToe(Pos::new(0, 0))));
        game.replay();
        assert_eq!(game.engine().turn(game.state()), Side::First);
        assert_eq!(game.computer_side(), Side::Second);
    }
}
