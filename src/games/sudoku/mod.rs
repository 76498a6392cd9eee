//! Computer opponents for the hybrid line/uniqueness game.

pub mod logic;
pub mod search;

pub use logic::{random_move, win_or_block_move, winning_placement};
pub use search::minimax_move;
