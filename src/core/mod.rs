//! Core types shared by every game: seats, boards and randomness.
//!
//! Nothing here knows any game's rules.

pub mod grid;
pub mod rng;
pub mod side;

pub use grid::{Grid, Pos, ALL_LINES, ORTHOGONAL_LINES, ORTHOGONAL_STEPS};
pub use rng::GameRng;
pub use side::{Side, SideMap};
