//! N×N board model shared by both games.
//!
//! Cells are stored row-major, index `row * size + col`. A [`Board`] is a value:
//! [`Board::place`] validates and returns an updated copy, leaving the original
//! untouched so older boards stay valid for audit or undo.

pub mod lines;
pub mod render;
pub mod rules;

pub use lines::{completed_lines, detect, line_owner, Line, Pattern, Win};
pub use render::render;
pub use rules::{has_legal_move, legal_placements, legal_values, validate, Illegal};

use crate::core::constants::{MARK_VALUE, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use serde::{Deserialize, Serialize};

/// One of the two sides at the table. The first participant plays `X`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    X,
    O,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::X, Side::O];

    pub fn opponent(self) -> Self {
        match self {
            Side::X => Side::O,
            Side::O => Side::X,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Side::X => 'X',
            Side::O => 'O',
        }
    }

    /// Index into a session's participant list.
    pub fn index(self) -> usize {
        match self {
            Side::X => 0,
            Side::O => 1,
        }
    }

    pub fn from_index(index: usize) -> Self {
        if index % 2 == 0 {
            Side::X
        } else {
            Side::O
        }
    }
}

/// Contents of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    /// `value` is 1..=N in the hybrid game and [`MARK_VALUE`] in the line game.
    Occupied { side: Side, value: u8 },
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            Cell::Occupied { side, .. } => Some(*side),
            Cell::Empty => None,
        }
    }

    pub fn value(&self) -> Option<u8> {
        match self {
            Cell::Occupied { value, .. } => Some(*value),
            Cell::Empty => None,
        }
    }
}

/// Which legality and win rules apply to a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ruleset {
    /// Classic line game: any empty cell, the mark is the side.
    Line,
    /// Values 1..=N, unique per row, column and sub-block.
    Hybrid,
}

/// A single placement: who puts what where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub cell: usize,
    pub value: u8,
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    ruleset: Ruleset,
    cells: Vec<Cell>,
    /// Most recent placement, used to attribute sequence wins
    last_placed: Option<usize>,
}

impl Board {
    /// Empty board, or `None` if `size` is outside 1..=9.
    pub fn new(size: usize, ruleset: Ruleset) -> Option<Self> {
        supported(size).then(|| Self::blank(size, ruleset))
    }

    /// Empty board of a size known to be supported.
    pub(crate) fn blank(size: usize, ruleset: Ruleset) -> Self {
        Self {
            size,
            ruleset,
            cells: vec![Cell::Empty; size * size],
            last_placed: None,
        }
    }

    /// Build a board from raw cells. Returns `None` if the size is unsupported
    /// or the cell count is not `size²`.
    ///
    /// No legality is checked, so this can describe positions that play could
    /// never reach.
    pub fn from_cells(
        size: usize,
        ruleset: Ruleset,
        cells: Vec<Cell>,
        last_placed: Option<usize>,
    ) -> Option<Self> {
        if !supported(size)
            || cells.len() != size * size
            || last_placed.is_some_and(|i| i >= cells.len())
        {
            return None;
        }
        Some(Self {
            size,
            ruleset,
            cells,
            last_placed,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn ruleset(&self) -> Ruleset {
        self.ruleset
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn last_placed(&self) -> Option<usize> {
        self.last_placed
    }

    /// Largest value a placement may carry (0 for the line game).
    pub fn max_value(&self) -> u8 {
        match self.ruleset {
            Ruleset::Line => MARK_VALUE,
            Ruleset::Hybrid => self.size as u8,
        }
    }

    /// Side length of the uniqueness sub-blocks, if this board has them.
    ///
    /// Only hybrid boards whose size is a perfect square (4, 9, ...) have blocks.
    pub fn block_size(&self) -> Option<usize> {
        if self.ruleset != Ruleset::Hybrid {
            return None;
        }
        let root = (self.size as f64).sqrt().round() as usize;
        (root > 1 && root * root == self.size).then_some(root)
    }

    pub fn row_col(&self, index: usize) -> (usize, usize) {
        (index / self.size, index % self.size)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_empty())
            .map(|(i, _)| i)
    }

    /// The middle cell for odd sizes, the middle 2×2 for even sizes.
    pub fn center_cells(&self) -> Vec<usize> {
        let n = self.size;
        if n % 2 == 1 {
            vec![(n / 2) * n + n / 2]
        } else {
            let lo = n / 2 - 1;
            vec![lo * n + lo, lo * n + lo + 1, (lo + 1) * n + lo, (lo + 1) * n + lo + 1]
        }
    }

    pub fn corner_cells(&self) -> [usize; 4] {
        let n = self.size;
        [0, n - 1, n * (n - 1), n * n - 1]
    }

    /// Validate a placement and return the resulting board.
    ///
    /// On failure `self` is unchanged and no copy is made.
    pub fn place(&self, placement: Placement) -> Result<Board, Illegal> {
        validate(self, placement.cell, placement.value, placement.side)?;
        let mut next = self.clone();
        next.put(placement);
        Ok(next)
    }

    /// Write a placement without validation. Returns the previous `last_placed`
    /// so search code can restore it with [`Board::take`].
    pub(crate) fn put(&mut self, placement: Placement) -> Option<usize> {
        let value = match self.ruleset {
            Ruleset::Line => MARK_VALUE,
            Ruleset::Hybrid => placement.value,
        };
        self.cells[placement.cell] = Cell::Occupied {
            side: placement.side,
            value,
        };
        self.last_placed.replace(placement.cell)
    }

    /// Reverse a [`Board::put`].
    pub(crate) fn take(&mut self, cell: usize, previous_last: Option<usize>) {
        self.cells[cell] = Cell::Empty;
        self.last_placed = previous_last;
    }
}

fn supported(size: usize) -> bool {
    (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size)
}
