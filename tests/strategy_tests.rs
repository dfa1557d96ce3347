//! Computer opponent behaviour on concrete positions.

use boardroom::core::{GameRng, Side};
use boardroom::games::dots_and_boxes::Edge;
use boardroom::games::{AnyGame, AnyMove, ConnectFour, DotsAndBoxes, GameId};
use boardroom::rules::RuleEngine;
use boardroom::strategy::{Fallback, Greedy, Minimax, Strategy, StrategyConfig, StrategyKind, UniformRandom};

fn play<E: RuleEngine>(engine: &E, moves: &[E::Move]) -> E::State {
    moves.iter().fold(engine.initial_state(), |state, mv| {
        engine.try_apply(&state, mv).expect("scripted move is legal")
    })
}

#[test]
fn test_connect_four_takes_the_win() {
    let game = ConnectFour;
    // Red holds the bottom of columns 0..=2; Yellow stacked elsewhere.
    let state = play(&game, &[0, 6, 1, 6, 2, 5]);
    let mut rng = GameRng::new(1);

    for depth in [1, 2, 4] {
        let choice = Minimax::new(depth).select_move(&game, &state, Side::First, &mut rng);
        assert_eq!(choice, Some(3), "depth {depth}");
    }
}

#[test]
fn test_connect_four_blocks_the_threat() {
    let game = ConnectFour;
    // Red has three stacked in column 3, Yellow to move.
    let state = play(&game, &[3, 0, 3, 1, 3]);
    assert_eq!(game.turn(&state), Side::Second);
    let mut rng = GameRng::new(1);

    let choice = Minimax::new(4).select_move(&game, &state, Side::Second, &mut rng);
    assert_eq!(choice, Some(3));
}

#[test]
fn test_minimax_is_deterministic() {
    let game = ConnectFour;
    let state = play(&game, &[3, 3, 2]);
    let a = Minimax::new(3).select_move(&game, &state, Side::Second, &mut GameRng::new(1));
    let b = Minimax::new(3).select_move(&game, &state, Side::Second, &mut GameRng::new(99));
    assert_eq!(a, b);
}

#[test]
fn test_dots_claims_the_open_box() {
    let game = DotsAndBoxes::default();
    let state = play(
        &game,
        &[Edge::horizontal(0, 0), Edge::horizontal(1, 0), Edge::vertical(0, 0)],
    );
    assert_eq!(game.turn(&state), Side::Second);
    let mut rng = GameRng::new(3);

    let choice = Greedy::new(Fallback::First).select_move(&game, &state, Side::Second, &mut rng);
    assert_eq!(choice, Some(Edge::vertical(0, 1)));

    // Claiming the box keeps the turn.
    let next = game.apply(&state, &Edge::vertical(0, 1));
    assert_eq!(game.turn(&next), Side::Second);
}

#[test]
fn test_random_stays_in_bounds() {
    let game = ConnectFour;
    let state = game.initial_state();
    let mut rng = GameRng::new(5);
    for _ in 0..50 {
        let column = UniformRandom.select_move(&game, &state, Side::First, &mut rng).unwrap();
        assert!(game.is_legal(&state, &column));
    }
}

#[test]
fn test_configured_opponents_move_for_every_game() {
    let config = StrategyConfig::default().with_depth(2);
    for id in GameId::ALL {
        let game = AnyGame::with_rng(id, &mut GameRng::new(config.seed));
        let state = game.initial_state();
        let strategy = config.strategy_for(id);
        let mut rng = GameRng::new(config.seed);

        let mv = strategy
            .select_move(&game, &state, Side::First, &mut rng)
            .unwrap_or_else(|| panic!("{id}: no move"));
        assert!(game.is_legal(&state, &mv), "{id}: {mv:?}");
        assert!(strategy.select_move(&game, &state, Side::Second, &mut rng).is_none());
    }
}

#[test]
fn test_strategy_kind_through_any_game() {
    let game = AnyGame::new(GameId::ConnectFour);
    let state = [0usize, 6, 1, 6, 2, 5]
        .into_iter()
        .fold(game.initial_state(), |s, col| game.apply(&s, &AnyMove::ConnectFour(col)));
    let mut rng = GameRng::new(0);
    let choice = StrategyKind::Minimax { depth: 2 }.select_move(&game, &state, Side::First, &mut rng);
    assert_eq!(choice, Some(AnyMove::ConnectFour(3)));
}
