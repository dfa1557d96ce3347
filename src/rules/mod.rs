//! Rule engine trait for game implementations.
//!
//! Games implement `RuleEngine` to define:
//! - The starting position
//! - Legal moves for each state
//! - How moves produce the next state
//! - Win/draw conditions
//!
//! Strategies and the session synchronizer call into `RuleEngine` but never
//! interpret game-specific concepts directly.

pub mod engine;

pub use engine::{GameResult, RuleEngine};
