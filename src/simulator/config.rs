//! Simulation configuration.

use crate::constants::{BOARD_HEIGHT, BOARD_WIDTH, MOVES_BUDGET, PALETTE_SIZE};
use crate::session::SessionConfig;

/// Configuration for a simulation batch.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of sessions to play
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Board width in cells (floored at 3)
    pub width: usize,

    /// Board height in cells (floored at 3)
    pub height: usize,

    /// Number of ordinary kinds in play (clamped to 3..=7)
    pub palette_size: usize,

    /// Move budget per session
    pub moves_budget: u32,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per-run detail)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 1000,
            seed: None,
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            palette_size: PALETTE_SIZE,
            moves_budget: MOVES_BUDGET,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Quick config for smoke-checking a balance change.
    pub fn quick_check() -> Self {
        Self {
            num_runs: 100,
            ..Default::default()
        }
    }

    /// Config for probing how palette width drives scoring. Fewer kinds
    /// mean denser matches and deeper cascades.
    pub fn palette_sweep(palette_size: usize) -> Self {
        Self {
            num_runs: 200,
            palette_size,
            ..Default::default()
        }
    }

    pub(crate) fn session_config(&self) -> SessionConfig {
        SessionConfig {
            width: self.width,
            height: self.height,
            palette_size: self.palette_size,
            moves_budget: self.moves_budget,
        }
    }
}
