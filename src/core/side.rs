//! Seat identification and per-seat data storage.
//!
//! ## Side
//!
//! Every game in the crate is a two-seat game. `Side::First` always moves
//! first; each variant attaches its own label (X/O, Red/Yellow,
//! White/Black, ...) for presentation.
//!
//! ## SideMap
//!
//! Fixed two-entry storage indexed by `Side`, used for scores, token
//! positions, secrets and anything else a state tracks per seat.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two seats at the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// The seat that moves first.
    First,
    /// The seat that moves second.
    Second,
}

impl Side {
    /// Both sides in turn order.
    pub const BOTH: [Side; 2] = [Side::First, Side::Second];

    /// The opposing side.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// 0-based seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }

    /// Pick the label for this side out of a `(first, second)` pair.
    #[must_use]
    pub fn label<T: Copy>(self, labels: (T, T)) -> T {
        match self {
            Side::First => labels.0,
            Side::Second => labels.1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::First => write!(f, "first"),
            Side::Second => write!(f, "second"),
        }
    }
}

/// Per-side data storage with O(1) access.
///
/// ```
/// use boardroom::core::{Side, SideMap};
///
/// let mut score: SideMap<u32> = SideMap::with_value(0);
/// score[Side::Second] += 2;
/// assert_eq!(score[Side::First], 0);
/// assert_eq!(score[Side::Second], 2);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create from explicit values for the first and second side.
    pub const fn new(first: T, second: T) -> Self {
        Self {
            data: [first, second],
        }
    }

    /// Create with values from a factory function.
    pub fn from_fn(factory: impl Fn(Side) -> T) -> Self {
        Self {
            data: [factory(Side::First), factory(Side::Second)],
        }
    }

    /// Create with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self {
            data: [value.clone(), value],
        }
    }

    /// Iterate over (Side, &T) pairs in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::BOTH.into_iter().zip(self.data.iter())
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        &self.data[side.index()]
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        &mut self.data[side.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_other() {
        assert_eq!(Side::First.other(), Side::Second);
        assert_eq!(Side::Second.other(), Side::First);
        assert_eq!(Side::First.other().other(), Side::First);
    }

    #[test]
    fn test_side_label() {
        assert_eq!(Side::First.label(('X', 'O')), 'X');
        assert_eq!(Side::Second.label(('X', 'O')), 'O');
    }

    #[test]
    fn test_side_map_from_fn() {
        let map = SideMap::from_fn(|side| side.index() * 10);
        assert_eq!(map[Side::First], 0);
        assert_eq!(map[Side::Second], 10);
    }

    #[test]
    fn test_side_map_mutation() {
        let mut map = SideMap::with_value(0u8);
        map[Side::First] = 3;
        assert_eq!(map[Side::First], 3);
        assert_eq!(map[Side::Second], 0);
    }

    #[test]
    fn test_side_map_iter() {
        let map = SideMap::new('a', 'b');
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(Side::First, &'a'), (Side::Second, &'b')]);
    }

    #[test]
    fn test_side_map_serialization() {
        let map = SideMap::new(1u32, 2u32);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: SideMap<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
