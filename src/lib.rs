//! # boardroom
//!
//! Turn-based two-player board games with computer opponents and a room
//! relay for online play.
//!
//! ## Design Principles
//!
//! 1. **Pure Rules**: Every game is a `RuleEngine`. Engines never mutate a
//!    position; `apply` returns the next state.
//!
//! 2. **Whole-State Sync**: Online play ships the complete encoded state
//!    after every move. The last update a client receives is its state.
//!
//! 3. **Dumb Relay**: The relay routes messages by room and never looks
//!    inside game state.
//!
//! ## Modules
//!
//! - `core`: Sides, grids and seeded RNG
//! - `rules`: `RuleEngine` trait and `GameResult`
//! - `games`: Ten variants plus `AnyGame` runtime dispatch
//! - `strategy`: Minimax, greedy and random computer opponents
//! - `session`: Relay-synchronized sessions and local computer matches
//! - `relay`: Wire protocol, routing tables, WebSocket server and client

pub mod core;
pub mod games;
pub mod relay;
pub mod rules;
pub mod session;
pub mod strategy;

// Re-export commonly used types
pub use crate::core::{GameRng, Grid, Pos, Side, SideMap};

pub use crate::rules::{GameResult, RuleEngine};

pub use crate::games::{AnyGame, AnyMove, AnyState, GameId};

pub use crate::strategy::{
    Fallback, Greedy, GreedyRules, Minimax, Strategy, StrategyConfig, StrategyKind, UniformRandom,
};

pub use crate::session::{ComputerMatch, SessionSynchronizer, SyncError};

pub use crate::relay::{
    ClientMessage, ConnectionId, Relay, RelayClient, RelayServer, RoomKey, ServerConfig, ServerMessage,
};
