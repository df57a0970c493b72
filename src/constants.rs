// Board geometry defaults
pub const BOARD_WIDTH: usize = 7;
pub const BOARD_HEIGHT: usize = 7;
pub const PALETTE_SIZE: usize = 6;

// Session budget
pub const MOVES_BUDGET: u32 = 20;

// Scoring
pub const ORDINARY_TILE_SCORE: u32 = 10;
pub const SPECIAL_TILE_SCORE: u32 = 50;

// Match run lengths
pub const MIN_RUN: usize = 3;
pub const BOMB_RUN: usize = 4;
pub const RAINBOW_RUN: usize = 5;

// Deadlock recovery: shuffle attempts before regenerating the board outright
pub const RESHUFFLE_RETRY_CAP: u32 = 64;
