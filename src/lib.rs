//! Tabletop - turn-based board games for chat bots.
//!
//! Two games share one engine: a 3×3 line game with a heuristic computer
//! opponent, and a hybrid line/Sudoku game whose computer opponent searches
//! with alpha-beta minimax. Callers drive everything through
//! [`session::Engine`] and show boards with [`board::render`].

pub mod board;
pub mod build_info;
pub mod core;
pub mod games;
pub mod session;

pub use crate::board::{render, Board, Cell, Pattern, Placement, Side};
pub use crate::core::{EngineConfig, GameError};
pub use crate::games::{Difficulty, Strategy, Variant};
pub use session::{
    spawn_sweeper, ChatId, Engine, MoveReport, Outcome, Participant, PlayerId, SessionKey,
    SessionSnapshot, StartReport,
};
