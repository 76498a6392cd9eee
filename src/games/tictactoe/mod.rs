//! Tic-tac-toe: the 3×3 line game and its priority-heuristic opponent.

pub mod logic;

pub use logic::{best_move, find_winning_cell};
