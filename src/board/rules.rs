//! Placement legality.
//!
//! Both rulesets require an in-range, empty target cell. The hybrid ruleset
//! additionally requires a value in 1..=N that does not already appear in the
//! cell's row, column or sub-block.

use super::{Board, Ruleset, Side};
use crate::core::constants::MARK_VALUE;

/// Why a placement was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Illegal {
    OutOfRange,
    Occupied,
    InvalidValue,
    ConstraintViolation,
}

impl Illegal {
    pub fn reason(self) -> &'static str {
        match self {
            Illegal::OutOfRange => "out-of-range",
            Illegal::Occupied => "occupied",
            Illegal::InvalidValue => "invalid-value",
            Illegal::ConstraintViolation => "constraint-violation",
        }
    }
}

/// Decide whether `side` may put `value` at `cell`. Never modifies the board.
///
/// The line game ignores `value`; the side is the mark.
pub fn validate(board: &Board, cell: usize, value: u8, _side: Side) -> Result<(), Illegal> {
    let current = board.cell(cell).ok_or(Illegal::OutOfRange)?;
    if !current.is_empty() {
        return Err(Illegal::Occupied);
    }

    match board.ruleset() {
        Ruleset::Line => Ok(()),
        Ruleset::Hybrid => {
            if value == 0 || value > board.max_value() {
                return Err(Illegal::InvalidValue);
            }
            if conflicts(board, cell, value) {
                return Err(Illegal::ConstraintViolation);
            }
            Ok(())
        }
    }
}

/// True if `value` already appears in the row, column or block of `cell`.
fn conflicts(board: &Board, cell: usize, value: u8) -> bool {
    let n = board.size();
    let cells = board.cells();
    let (row, col) = board.row_col(cell);
    let holds = |i: usize| cells[i].value() == Some(value);

    if (0..n).any(|k| holds(row * n + k) || holds(k * n + col)) {
        return true;
    }

    if let Some(block) = board.block_size() {
        let top = row - row % block;
        let left = col - col % block;
        for r in top..top + block {
            for c in left..left + block {
                if holds(r * n + c) {
                    return true;
                }
            }
        }
    }

    false
}

/// Values that may currently be placed at `cell`, ascending.
pub fn legal_values(board: &Board, cell: usize) -> Vec<u8> {
    match board.cell(cell) {
        Some(c) if c.is_empty() => {}
        _ => return Vec::new(),
    }
    match board.ruleset() {
        Ruleset::Line => vec![MARK_VALUE],
        Ruleset::Hybrid => (1..=board.max_value())
            .filter(|&v| !conflicts(board, cell, v))
            .collect(),
    }
}

/// Every legal `(cell, value)` pair, in cell order then value order.
pub fn legal_placements(board: &Board) -> Vec<(usize, u8)> {
    board
        .empty_cells()
        .flat_map(|cell| {
            legal_values(board, cell)
                .into_iter()
                .map(move |value| (cell, value))
        })
        .collect()
}

pub fn has_legal_move(board: &Board) -> bool {
    match board.ruleset() {
        Ruleset::Line => board.empty_cells().next().is_some(),
        Ruleset::Hybrid => board
            .empty_cells()
            .any(|cell| (1..=board.max_value()).any(|v| !conflicts(board, cell, v))),
    }
}
