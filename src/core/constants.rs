// Session lifetime
pub const IDLE_TIMEOUT_SECONDS: u64 = 5 * 60;
pub const SWEEP_INTERVAL_SECONDS: u64 = 60;

// Search
pub const DEFAULT_SEARCH_DEPTH: u8 = 4;
pub const MAX_SEARCH_DEPTH: u8 = 6;
pub const WIN_SCORE: i32 = 100;

// Boards
pub const TICTACTOE_SIZE: usize = 3;
pub const SUDOKU_SIZE: usize = 4;
pub const SUDOKU_MINI_SIZE: usize = 3;
/// Supported board sizes; hybrid values must fit a single digit.
pub const MIN_BOARD_SIZE: usize = 1;
pub const MAX_BOARD_SIZE: usize = 9;

/// Value stored in cells of the line game, where only the side matters.
pub const MARK_VALUE: u8 = 0;

// Environment overrides for `EngineConfig::from_env`
pub const ENV_IDLE_TIMEOUT: &str = "TABLETOP_IDLE_TIMEOUT_SECS";
pub const ENV_SWEEP_INTERVAL: &str = "TABLETOP_SWEEP_INTERVAL_SECS";
pub const ENV_HARD_DEPTH: &str = "TABLETOP_HARD_DEPTH";
pub const ENV_SEED: &str = "TABLETOP_SEED";
