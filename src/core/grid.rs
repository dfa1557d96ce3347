//! Rectangular board storage and line scanning.
//!
//! `Grid<T>` is backed by an `im::Vector`, so `set` returns a new grid that
//! shares structure with the old one. Rule engines never mutate a board in
//! place; the previous board stays valid after every move.

use im::Vector;
use serde::{Deserialize, Serialize};

/// A board coordinate. Row 0 is the first row of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    /// Create a new position.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Row and column scan directions.
pub const ORTHOGONAL_LINES: [(isize, isize); 2] = [(0, 1), (1, 0)];

/// Row, column and both diagonal scan directions.
pub const ALL_LINES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// The four orthogonal single steps.
pub const ORTHOGONAL_STEPS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Persistent rectangular grid stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T: Clone> {
    rows: usize,
    cols: usize,
    cells: Vector<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `fill`.
    pub fn new(rows: usize, cols: usize, fill: T) -> Self {
        Self {
            rows,
            cols,
            cells: Vector::from(vec![fill; rows * cols]),
        }
    }

    /// Create a grid from a per-cell factory.
    pub fn from_fn(rows: usize, cols: usize, factory: impl Fn(Pos) -> T) -> Self {
        let cells = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| Pos::new(row, col)))
            .map(factory)
            .collect();
        Self { rows, cols, cells }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `pos` lies on the grid.
    #[must_use]
    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Row-major index of `pos`.
    #[must_use]
    pub fn index_of(&self, pos: Pos) -> usize {
        pos.row * self.cols + pos.col
    }

    /// Position of a row-major index.
    #[must_use]
    pub fn pos_of(&self, index: usize) -> Pos {
        let cols = self.cols.max(1);
        Pos::new(index / cols, index % cols)
    }

    /// Whether the grid is `rows` x `cols` with exactly that many cells.
    /// A decoded grid can claim any dimensions.
    #[must_use]
    pub fn has_shape(&self, rows: usize, cols: usize) -> bool {
        self.rows == rows && self.cols == cols && rows.checked_mul(cols) == Some(self.cells.len())
    }

    /// Cell at `pos`, or `None` off the board.
    #[must_use]
    pub fn get(&self, pos: Pos) -> Option<&T> {
        if self.contains(pos) {
            self.cells.get(self.index_of(pos))
        } else {
            None
        }
    }

    /// Cell at a row-major index.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&T> {
        self.cells.get(index)
    }

    /// Return a new grid with `pos` set to `value`.
    ///
    /// Off-board positions leave the grid unchanged.
    #[must_use]
    pub fn set(&self, pos: Pos, value: T) -> Self {
        if !self.contains(pos) {
            return self.clone();
        }
        Self {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.update(self.index_of(pos), value),
        }
    }

    /// Step from `pos` by `(dr, dc)`, staying on the board.
    #[must_use]
    pub fn offset(&self, pos: Pos, dr: isize, dc: isize) -> Option<Pos> {
        let row = pos.row.checked_add_signed(dr)?;
        let col = pos.col.checked_add_signed(dc)?;
        let next = Pos::new(row, col);
        self.contains(next).then_some(next)
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        (0..self.cells.len()).map(move |i| self.pos_of(i))
    }

    /// All (position, cell) pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Pos, &T)> + '_ {
        self.cells.iter().enumerate().map(move |(i, cell)| (self.pos_of(i), cell))
    }

    /// Number of cells matching `pred`.
    pub fn count(&self, pred: impl Fn(&T) -> bool) -> usize {
        self.cells.iter().filter(|cell| pred(cell)).count()
    }

    /// Consecutive cells matching `pred` starting one step from `pos`.
    fn run_length(&self, pos: Pos, dr: isize, dc: isize, pred: &impl Fn(&T) -> bool) -> usize {
        let mut count = 0;
        let mut cursor = pos;
        while let Some(next) = self.offset(cursor, dr, dc) {
            match self.get(next) {
                Some(cell) if pred(cell) => {
                    count += 1;
                    cursor = next;
                }
                _ => break,
            }
        }
        count
    }

    /// Whether a run of at least `len` cells matching `pred` passes through
    /// `pos` along any of `directions`. The cell at `pos` counts as matching.
    pub fn has_line_through(
        &self,
        pos: Pos,
        len: usize,
        directions: &[(isize, isize)],
        pred: impl Fn(&T) -> bool,
    ) -> bool {
        directions.iter().any(|&(dr, dc)| {
            1 + self.run_length(pos, dr, dc, &pred) + self.run_length(pos, -dr, -dc, &pred) >= len
        })
    }
}
