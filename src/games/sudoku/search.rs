//! Hard opponent: depth-bounded minimax with alpha-beta pruning.
//!
//! The root position is cloned once; below that every move is applied with
//! `Board::put` and reverted with `Board::take`. Only placements that pass
//! validation are generated, so illegal positions are never searched.

use crate::board::{completed_lines, detect, legal_placements, Board, Placement, Side};
use crate::core::constants::WIN_SCORE;
use tracing::debug;

/// Best placement for `side` searching `depth` plies ahead.
///
/// Ties keep the earliest move in cell-then-value order, so the choice is
/// deterministic and identical to what an unpruned search would pick.
pub fn minimax_move(board: &Board, side: Side, depth: u8) -> Option<Placement> {
    let mut work = board.clone();
    let depth = i32::from(depth.max(1));
    let mut nodes: u64 = 0;

    let mut best: Option<(Placement, i32)> = None;
    for (cell, value) in legal_placements(&work) {
        let placement = Placement { cell, value, side };
        let previous = work.put(placement);
        let score = score_after(
            &mut work,
            placement,
            side,
            depth - 1,
            i32::MIN,
            i32::MAX,
            &mut nodes,
        );
        work.take(cell, previous);

        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((placement, score));
        }
    }

    if let Some((placement, score)) = best {
        debug!(
            cell = placement.cell,
            value = placement.value,
            score,
            nodes,
            depth,
            "minimax move chosen"
        );
    }
    best.map(|(placement, _)| placement)
}

/// Score the position just after `placement`, from `me`'s point of view.
fn score_after(
    board: &mut Board,
    placement: Placement,
    me: Side,
    depth: i32,
    alpha: i32,
    beta: i32,
    nodes: &mut u64,
) -> i32 {
    *nodes += 1;
    if let Some(win) = detect(board) {
        // faster wins and slower losses score further from zero
        return if win.side == me {
            WIN_SCORE + depth
        } else {
            -(WIN_SCORE + depth)
        };
    }
    search(board, placement.side.opponent(), me, depth, alpha, beta, nodes)
}

/// Alpha-beta over the position with `to_move` about to play.
pub(crate) fn search(
    board: &mut Board,
    to_move: Side,
    me: Side,
    depth: i32,
    mut alpha: i32,
    mut beta: i32,
    nodes: &mut u64,
) -> i32 {
    if depth <= 0 {
        return evaluate(board, me);
    }

    let moves = legal_placements(board);
    if moves.is_empty() {
        return 0;
    }

    let maximizing = to_move == me;
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for (cell, value) in moves {
        let placement = Placement {
            cell,
            value,
            side: to_move,
        };
        let previous = board.put(placement);
        let score = score_after(board, placement, me, depth - 1, alpha, beta, nodes);
        board.take(cell, previous);

        if maximizing {
            best = best.max(score);
            alpha = alpha.max(score);
        } else {
            best = best.min(score);
            beta = beta.min(score);
        }
        if beta <= alpha {
            break;
        }
    }
    best
}

/// Completed lines for `me` minus completed lines for the opponent.
pub fn evaluate(board: &Board, me: Side) -> i32 {
    completed_lines(board, me) - completed_lines(board, me.opponent())
}
