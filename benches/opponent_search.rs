use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use boardroom::core::{GameRng, Side};
use boardroom::games::{AnyGame, ConnectFour, DotsAndBoxes, GameId};
use boardroom::relay::{ClientMessage, Relay, RoomKey};
use boardroom::rules::RuleEngine;
use boardroom::strategy::{Fallback, Greedy, Minimax, Strategy};

fn bench_minimax_connect_four(c: &mut Criterion) {
    let game = ConnectFour;
    let state = game.initial_state();
    let mut group = c.benchmark_group("minimax_connect_four");

    for depth in [2, 4, 6] {
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            let strategy = Minimax::new(depth);
            let mut rng = GameRng::new(42);
            b.iter(|| black_box(strategy.select_move(&game, black_box(&state), Side::First, &mut rng)));
        });
    }
    group.finish();
}

fn bench_greedy_dots(c: &mut Criterion) {
    let game = DotsAndBoxes::default();
    let state = game.initial_state();
    let strategy = Greedy::new(Fallback::First);

    c.bench_function("greedy_dots_and_boxes_opening", |b| {
        let mut rng = GameRng::new(42);
        b.iter(|| black_box(strategy.select_move(&game, black_box(&state), Side::First, &mut rng)));
    });
}

fn bench_available_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("available_moves");
    for id in [GameId::Chess, GameId::Checkers, GameId::Gomoku] {
        let game = AnyGame::new(id);
        let state = game.initial_state();
        group.bench_function(id.as_str(), |b| b.iter(|| black_box(game.available_moves(black_box(&state)))));
    }
    group.finish();
}

fn bench_state_fan_out(c: &mut Criterion) {
    let mut relay = Relay::new();
    let room = RoomKey::new("bench", "chess");
    let sender = relay.connect();
    relay.join(sender, room.clone());
    for _ in 0..7 {
        let member = relay.connect();
        relay.join(member, room.clone());
    }
    let payload = vec![0u8; 512];

    c.bench_function("relay_state_fan_out_8", |b| {
        b.iter(|| {
            let message = ClientMessage::state_update(&room, payload.clone());
            black_box(relay.handle(sender, message))
        })
    });
}

criterion_group!(
    benches,
    bench_minimax_connect_four,
    bench_greedy_dots,
    bench_available_moves,
    bench_state_fan_out,
);
criterion_main!(benches);
