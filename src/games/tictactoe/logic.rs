//! Priority-heuristic computer opponent for the line game.
//!
//! Candidates are tried against the real win detector rather than a separate
//! table of lines, so the heuristic works for any board size.

use crate::board::{detect, Board, Placement, Side};
use crate::core::constants::MARK_VALUE;
use rand::seq::SliceRandom;
use rand::Rng;

/// Pick a move for `side`: win, else block, else center, else a random corner,
/// else any random empty cell. Returns `None` on a full board.
pub fn best_move<R: Rng>(board: &Board, side: Side, rng: &mut R) -> Option<Placement> {
    let mark = |cell| Placement {
        cell,
        value: MARK_VALUE,
        side,
    };

    let empty: Vec<usize> = board.empty_cells().collect();
    if empty.is_empty() {
        return None;
    }

    if let Some(cell) = find_winning_cell(board, side) {
        return Some(mark(cell));
    }

    if let Some(cell) = find_winning_cell(board, side.opponent()) {
        return Some(mark(cell));
    }

    let centers: Vec<usize> = board
        .center_cells()
        .into_iter()
        .filter(|c| empty.contains(c))
        .collect();
    if let Some(&cell) = centers.choose(rng) {
        return Some(mark(cell));
    }

    let corners: Vec<usize> = board
        .corner_cells()
        .into_iter()
        .filter(|c| empty.contains(c))
        .collect();
    if let Some(&cell) = corners.choose(rng) {
        return Some(mark(cell));
    }

    empty.choose(rng).map(|&cell| mark(cell))
}

/// Lowest empty cell where `side` would complete a line, if any.
pub fn find_winning_cell(board: &Board, side: Side) -> Option<usize> {
    board.empty_cells().find(|&cell| {
        board
            .place(Placement {
                cell,
                value: MARK_VALUE,
                side,
            })
            .ok()
            .and_then(|next| detect(&next))
            .is_some_and(|win| win.side == side)
    })
}
