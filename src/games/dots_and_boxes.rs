//! Dots-and-Boxes: sides take turns drawing edges between adjacent dots.
//!
//! Drawing the fourth edge of a box claims it and grants another move.
//! When every edge is drawn the side with more boxes wins.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Grid, Pos, Side, SideMap};
use crate::games::GameId;
use crate::rules::{GameResult, RuleEngine};

pub const DEFAULT_BOXES: usize = 3;

/// Edge direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Edge between `(row, col)` and `(row, col + 1)` dots.
    Horizontal,
    /// Edge between `(row, col)` and `(row + 1, col)` dots.
    Vertical,
}

/// An edge, addressed by the dot it starts from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub orientation: Orientation,
    pub row: usize,
    pub col: usize,
}

impl Edge {
    #[must_use]
    pub const fn horizontal(row: usize, col: usize) -> Self {
        Self {
            orientation: Orientation::Horizontal,
            row,
            col,
        }
    }

    #[must_use]
    pub const fn vertical(row: usize, col: usize) -> Self {
        Self {
            orientation: Orientation::Vertical,
            row,
            col,
        }
    }

    fn pos(&self) -> Pos {
        Pos::new(self.row, self.col)
    }
}

/// Dots-and-Boxes rules for a `rows` x `cols` grid of boxes.
#[derive(Clone, Copy, Debug)]
pub struct DotsAndBoxes {
    rows: usize,
    cols: usize,
}

impl Default for DotsAndBoxes {
    fn default() -> Self {
        Self::new(DEFAULT_BOXES, DEFAULT_BOXES)
    }
}

/// Dots-and-Boxes position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotsAndBoxesState {
    /// `(rows + 1) x cols` horizontal edges.
    pub horizontal: Grid<bool>,
    /// `rows x (cols + 1)` vertical edges.
    pub vertical: Grid<bool>,
    /// Box owners.
    pub boxes: Grid<Option<Side>>,
    pub scores: SideMap<u32>,
    pub turn: Side,
    pub result: Option<GameResult>,
}

impl DotsAndBoxesState {
    /// Whether `edge` has been drawn.
    #[must_use]
    pub fn is_drawn(&self, edge: Edge) -> bool {
        let grid = match edge.orientation {
            Orientation::Horizontal => &self.horizontal,
            Orientation::Vertical => &self.vertical,
        };
        grid.get(edge.pos()).copied().unwrap_or(false)
    }

    /// Number of drawn edges around the box at `pos`.
    #[must_use]
    pub fn drawn_sides(&self, pos: Pos) -> usize {
        box_edges(pos).iter().filter(|e| self.is_drawn(**e)).count()
    }
}

/// The four edges of the box at `pos`.
fn box_edges(pos: Pos) -> [Edge; 4] {
    [
        Edge::horizontal(pos.row, pos.col),
        Edge::horizontal(pos.row + 1, pos.col),
        Edge::vertical(pos.row, pos.col),
        Edge::vertical(pos.row, pos.col + 1),
    ]
}

impl DotsAndBoxes {
    /// Board with `rows` x `cols` boxes (at least 1x1).
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    /// Boxes bordered by `edge` (one on the rim, two inside).
    #[must_use]
    pub fn boxes_of(&self, edge: Edge) -> SmallVec<[Pos; 2]> {
        let mut boxes = SmallVec::new();
        match edge.orientation {
            Orientation::Horizontal => {
                if edge.row > 0 {
                    boxes.push(Pos::new(edge.row - 1, edge.col));
                }
                if edge.row < self.rows {
                    boxes.push(Pos::new(edge.row, edge.col));
                }
            }
            Orientation::Vertical => {
                if edge.col > 0 {
                    boxes.push(Pos::new(edge.row, edge.col - 1));
                }
                if edge.col < self.cols {
                    boxes.push(Pos::new(edge.row, edge.col));
                }
            }
        }
        boxes
    }

    /// Whether drawing `edge` closes at least one box.
    #[must_use]
    pub fn completes_box(&self, state: &DotsAndBoxesState, edge: Edge) -> bool {
        self.boxes_of(edge).iter().any(|b| state.drawn_sides(*b) == 3)
    }

    /// Whether drawing `edge` leaves a box with three sides for the opponent.
    #[must_use]
    pub fn offers_box(&self, state: &DotsAndBoxesState, edge: Edge) -> bool {
        self.boxes_of(edge).iter().any(|b| state.drawn_sides(*b) == 2)
    }
}

impl RuleEngine for DotsAndBoxes {
    type State = DotsAndBoxesState;
    type Move = Edge;

    fn game_id(&self) -> GameId {
        GameId::DotsAndBoxes
    }

    fn initial_state(&self) -> DotsAndBoxesState {
        DotsAndBoxesState {
            horizontal: Grid::new(self.rows + 1, self.cols, false),
            vertical: Grid::new(self.rows, self.cols + 1, false),
            boxes: Grid::new(self.rows, self.cols, None),
            scores: SideMap::with_value(0),
            turn: Side::First,
            result: None,
        }
    }

    fn turn(&self, state: &DotsAndBoxesState) -> Side {
        state.turn
    }

    /// Undrawn edges: horizontal ones row-major, then vertical ones.
    fn available_moves(&self, state: &DotsAndBoxesState) -> Vec<Edge> {
        if state.result.is_some() {
            return vec![];
        }
        let horizontal = state
            .horizontal
            .iter()
            .filter(|(_, drawn)| !**drawn)
            .map(|(pos, _)| Edge::horizontal(pos.row, pos.col));
        let vertical = state
            .vertical
            .iter()
            .filter(|(_, drawn)| !**drawn)
            .map(|(pos, _)| Edge::vertical(pos.row, pos.col));
        horizontal.chain(vertical).collect()
    }

    fn is_legal(&self, state: &DotsAndBoxesState, mv: &Edge) -> bool {
        let grid = match mv.orientation {
            Orientation::Horizontal => &state.horizontal,
            Orientation::Vertical => &state.vertical,
        };
        state.result.is_none() && grid.get(mv.pos()) == Some(&false)
    }

    fn apply(&self, state: &DotsAndBoxesState, mv: &Edge) -> DotsAndBoxesState {
        let mover = state.turn;
        let mut next = state.clone();
        match mv.orientation {
            Orientation::Horizontal => next.horizontal = state.horizontal.set(mv.pos(), true),
            Orientation::Vertical => next.vertical = state.vertical.set(mv.pos(), true),
        }

        let mut claimed = 0;
        for pos in self.boxes_of(*mv) {
            if next.drawn_sides(pos) == 4 && next.boxes.get(pos) == Some(&None) {
                next.boxes = next.boxes.set(pos, Some(mover));
                claimed += 1;
            }
        }
        next.scores[mover] = next.scores[mover].saturating_add(claimed);

        // Claiming a box earns another move.
        next.turn = if claimed > 0 { mover } else { mover.other() };

        let all_drawn = next.horizontal.count(|d| !*d) == 0 && next.vertical.count(|d| !*d) == 0;
        if all_drawn {
            let (first, second) = (next.scores[Side::First], next.scores[Side::Second]);
            next.result = Some(match first.cmp(&second) {
                std::cmp::Ordering::Greater => GameResult::Winner(Side::First),
                std::cmp::Ordering::Less => GameResult::Winner(Side::Second),
                std::cmp::Ordering::Equal => GameResult::Draw,
            });
        }
        next
    }

    fn is_well_formed(&self, state: &DotsAndBoxesState) -> bool {
        state.horizontal.has_shape(self.rows + 1, self.cols)
            && state.vertical.has_shape(self.rows, self.cols + 1)
            && state.boxes.has_shape(self.rows, self.cols)
    }

    fn terminal(&self, state: &DotsAndBoxesState) -> Option<GameResult> {
        state.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_count() {
        let game = DotsAndBoxes::new(2, 3);
        let state = game.initial_state();
        // 3 rows of 3 horizontal + 2 rows of 4 vertical
        assert_eq!(game.available_moves(&state).len(), 9 + 8);
    }

    #[test]
    fn test_boxes_of() {
        let game = DotsAndBoxes::new(2, 2);
        assert_eq!(game.boxes_of(Edge::horizontal(0, 0)).as_slice(), &[Pos::new(0, 0)]);
        assert_eq!(
            game.boxes_of(Edge::horizontal(1, 1)).as_slice(),
            &[Pos::new(0, 1), Pos::new(1, 1)]
        );
        assert_eq!(game.boxes_of(Edge::vertical(1, 2)).as_slice(), &[Pos::new(1, 1)]);
    }

    #[test]
    fn test_claim_box_keeps_turn() {
        let game = DotsAndBoxes::new(1, 2);
        let mut state = game.initial_state();
        state = game.apply(&state, &Edge::horizontal(0, 0));
        assert_eq!(state.turn, Side::Second);
        state = game.apply(&state, &Edge::horizontal(1, 0));
        state = game.apply(&state, &Edge::vertical(0, 0));
        assert_eq!(state.turn, Side::Second);
        assert!(game.completes_box(&state, Edge::vertical(0, 1)));

        state = game.apply(&state, &Edge::vertical(0, 1));
        assert_eq!(state.boxes.get(Pos::new(0, 0)), Some(&Some(Side::Second)));
        assert_eq!(state.scores[Side::Second], 1);
        assert_eq!(state.turn, Side::Second);
        assert_eq!(game.terminal(&state), None);
    }

    #[test]
    fn test_game_ends_when_all_edges_drawn() {
        let game = DotsAndBoxes::new(1, 1);
        let mut state = game.initial_state();
        for edge in game.available_moves(&state) {
            state = game.apply(&state, &edge);
        }
        // First draws, Second draws, First draws, Second closes the box.
        assert_eq!(game.terminal(&state), Some(GameResult::Winner(Side::Second)));
        assert!(game.available_moves(&state).is_empty());
    }

    #[test]
    fn test_drawn_edge_is_illegal() {
        let game = DotsAndBoxes::default();
        let state = game.apply(&game.initial_state(), &Edge::vertical(0, 0));
        assert!(!game.is_legal(&state, &Edge::vertical(0, 0)));
        assert!(!game.is_legal(&state, &Edge::vertical(0, 9)));
        assert!(game.is_legal(&state, &Edge::vertical(0, 1)));
    }
}
