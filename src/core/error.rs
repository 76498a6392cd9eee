//! Error taxonomy for engine requests.
//!
//! Every error is recoverable: a rejected request never changes a board or a
//! session. Cell indices are stored 0-based and printed 1-based, matching the
//! numbering shown by [`crate::board::render`].

use crate::board::Illegal;
use crate::games::Variant;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("there is no {variant} game running in this chat")]
    NoActiveSession { variant: Variant },

    #[error("a {variant} game is already running in this chat")]
    SessionAlreadyActive { variant: Variant },

    #[error("it is not {player}'s turn")]
    OutOfTurn { player: String },

    #[error("cell {} is off the board (cells are 1-{cells})", .cell.saturating_add(1))]
    OutOfRangeCell { cell: usize, cells: usize },

    #[error("cell {} is already taken", .cell.saturating_add(1))]
    OccupiedCell { cell: usize },

    #[error("{value} already appears in the row, column or block of cell {}", .cell.saturating_add(1))]
    ConstraintViolation { cell: usize, value: u8 },

    #[error("a value between 1 and {max} is required")]
    InvalidValue { value: Option<u8>, max: u8 },

    #[error("invalid participants: {0}")]
    InvalidParticipants(String),

    #[error("unknown game '{0}'")]
    UnknownVariant(String),

    #[error("unknown difficulty '{0}'")]
    UnknownDifficulty(String),
}

impl GameError {
    /// Stable machine-readable code, for callers that localize messages.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::NoActiveSession { .. } => "no-active-session",
            GameError::SessionAlreadyActive { .. } => "session-already-active",
            GameError::OutOfTurn { .. } => "out-of-turn",
            GameError::OutOfRangeCell { .. } => "out-of-range-cell",
            GameError::OccupiedCell { .. } => "occupied-cell",
            GameError::ConstraintViolation { .. } => "constraint-violation",
            GameError::InvalidValue { .. } => "invalid-value",
            GameError::InvalidParticipants(_) => "invalid-participants",
            GameError::UnknownVariant(_) => "unknown-variant",
            GameError::UnknownDifficulty(_) => "unknown-difficulty",
        }
    }

    /// Attach the request context to a validation failure.
    pub fn from_illegal(reason: Illegal, cell: usize, value: u8, cells: usize, max: u8) -> Self {
        match reason {
            Illegal::OutOfRange => GameError::OutOfRangeCell { cell, cells },
            Illegal::Occupied => GameError::OccupiedCell { cell },
            Illegal::ConstraintViolation => GameError::ConstraintViolation { cell, value },
            Illegal::InvalidValue => GameError::InvalidValue {
                value: Some(value),
                max,
            },
        }
    }
}
