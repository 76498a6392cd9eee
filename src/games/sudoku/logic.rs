//! Easy and medium opponents.

use crate::board::{detect, legal_placements, legal_values, Board, Placement, Side};
use rand::seq::SliceRandom;
use rand::Rng;

/// Easy: any legal `(cell, value)` with equal probability.
pub fn random_move<R: Rng>(board: &Board, side: Side, rng: &mut R) -> Option<Placement> {
    legal_placements(board)
        .choose(rng)
        .map(|&(cell, value)| Placement { cell, value, side })
}

/// First legal placement (cell order, then value order) that wins for `side`.
pub fn winning_placement(board: &Board, side: Side) -> Option<Placement> {
    legal_placements(board)
        .into_iter()
        .map(|(cell, value)| Placement { cell, value, side })
        .find(|&placement| wins(board, placement))
}

fn wins(board: &Board, placement: Placement) -> bool {
    board
        .place(placement)
        .ok()
        .and_then(|next| detect(&next))
        .is_some_and(|win| win.side == placement.side)
}

/// Medium: take a win, else occupy a cell where the opponent could win next
/// turn, else play somewhere in the center, else play anywhere.
pub fn win_or_block_move<R: Rng>(board: &Board, side: Side, rng: &mut R) -> Option<Placement> {
    let legal = legal_placements(board);
    if legal.is_empty() {
        return None;
    }

    if let Some(placement) = winning_placement(board, side) {
        return Some(placement);
    }

    let opponent = side.opponent();
    let mut threats: Vec<usize> = legal
        .iter()
        .filter(|&&(cell, value)| {
            wins(
                board,
                Placement {
                    cell,
                    value,
                    side: opponent,
                },
            )
        })
        .map(|&(cell, _)| cell)
        .collect();
    threats.dedup();
    if let Some(&cell) = threats.choose(rng) {
        // every threat cell is empty and had a legal opponent value, so it
        // has at least one legal value for us too
        if let Some(&value) = legal_values(board, cell).choose(rng) {
            return Some(Placement { cell, value, side });
        }
    }

    let centers = board.center_cells();
    let central: Vec<(usize, u8)> = legal
        .iter()
        .copied()
        .filter(|(cell, _)| centers.contains(cell))
        .collect();
    let pool = if central.is_empty() { &legal } else { &central };
    pool.choose(rng)
        .map(|&(cell, value)| Placement { cell, value, side })
}
