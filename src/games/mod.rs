//! Game catalogue: variants, difficulty tiers and computer-opponent strategies.

pub mod sudoku;
pub mod tictactoe;

use crate::board::{Board, Placement, Ruleset, Side};
use crate::core::constants::{
    DEFAULT_SEARCH_DEPTH, MAX_SEARCH_DEPTH, SUDOKU_MINI_SIZE, SUDOKU_SIZE, TICTACTOE_SIZE,
};
use crate::core::GameError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A concrete ruleset sharing the common engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// 3×3 line game
    TicTacToe,
    /// 4×4 hybrid game with 2×2 uniqueness blocks
    SudokuToe,
    /// 3×3 hybrid preset, row/column uniqueness only
    SudokuToeMini,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::TicTacToe, Variant::SudokuToe, Variant::SudokuToeMini];

    pub fn name(&self) -> &'static str {
        match self {
            Self::TicTacToe => "tictactoe",
            Self::SudokuToe => "sudoku",
            Self::SudokuToeMini => "sudoku-mini",
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Self::TicTacToe => TICTACTOE_SIZE,
            Self::SudokuToe => SUDOKU_SIZE,
            Self::SudokuToeMini => SUDOKU_MINI_SIZE,
        }
    }

    pub fn ruleset(&self) -> Ruleset {
        match self {
            Self::TicTacToe => Ruleset::Line,
            Self::SudokuToe | Self::SudokuToeMini => Ruleset::Hybrid,
        }
    }

    /// Whether a move must carry a value.
    pub fn takes_value(&self) -> bool {
        self.ruleset() == Ruleset::Hybrid
    }

    pub fn new_board(&self) -> Board {
        Board::blank(self.size(), self.ruleset())
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tictactoe" | "tic-tac-toe" | "ttt" => Ok(Self::TicTacToe),
            "sudoku" | "sudokutoe" | "sudoku-toe" | "hybrid" => Ok(Self::SudokuToe),
            "sudoku-mini" | "sudokumini" | "mini" => Ok(Self::SudokuToeMini),
            _ => Err(GameError::UnknownVariant(s.to_string())),
        }
    }
}

/// How hard the computer plays. Only meaningful for the hybrid game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard { depth: u8 },
}

impl Difficulty {
    pub fn hard() -> Self {
        Self::Hard {
            depth: DEFAULT_SEARCH_DEPTH,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard { .. } => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" | "novice" => Ok(Self::Easy),
            "medium" | "normal" => Ok(Self::Medium),
            "hard" | "master" => Ok(Self::hard()),
            _ => Err(GameError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Computer-opponent strategy, resolved once when a session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Win, block, center, corner, any (line game)
    Heuristic,
    /// Uniform over legal placements
    Random,
    /// Win, deny the opponent's win, center, random
    WinOrBlock,
    /// Alpha-beta minimax to a fixed ply depth
    Minimax { depth: u8 },
}

impl Strategy {
    /// Pick the strategy for a variant. A missing difficulty means `Medium`.
    pub fn for_game(variant: Variant, difficulty: Option<Difficulty>) -> Self {
        match variant.ruleset() {
            Ruleset::Line => Self::Heuristic,
            Ruleset::Hybrid => match difficulty.unwrap_or(Difficulty::Medium) {
                Difficulty::Easy => Self::Random,
                Difficulty::Medium => Self::WinOrBlock,
                Difficulty::Hard { depth } => Self::Minimax {
                    depth: depth.clamp(1, MAX_SEARCH_DEPTH),
                },
            },
        }
    }

    /// Choose a legal placement for `side`, or `None` if there is none.
    pub fn choose<R: Rng>(&self, board: &Board, side: Side, rng: &mut R) -> Option<Placement> {
        match self {
            Self::Heuristic => tictactoe::best_move(board, side, rng),
            Self::Random => sudoku::random_move(board, side, rng),
            Self::WinOrBlock => sudoku::win_or_block_move(board, side, rng),
            Self::Minimax { depth } => sudoku::minimax_move(board, side, *depth),
        }
    }
}
