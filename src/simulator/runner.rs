//! Simulation runner driving real sessions with a greedy bot.
//!
//! The bot plays the first matching swap the move scanner reports, and
//! detonates a special when no swap exists. Not optimal play, but cheap
//! and deterministic per seed, which is what balance comparisons need.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::config::SimConfig;
use super::report::SimReport;
use crate::moves;
use crate::session::Session;

/// Everything measured from one simulated session.
#[derive(Debug, Clone)]
pub struct RunStats {
    pub final_score: u32,
    pub moves_used: u32,
    pub effective_swaps: u32,
    pub manual_triggers: u32,
    pub total_passes: u32,
    pub longest_cascade: u32,
    pub ordinary_cleared: u32,
    pub specials_cleared: u32,
    pub bombs_spawned: u32,
    pub rainbows_spawned: u32,
    pub wasted_rainbows: u32,
    pub reshuffles: u32,
    pub boards_regenerated: u32,
}

/// Run the full simulation batch and return a report.
pub fn run_simulation(config: &SimConfig) -> SimReport {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        // One RNG per run so runs stay independent and reproducible.
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed + run_idx as u64),
            None => ChaCha8Rng::from_entropy(),
        };

        let run_stats = simulate_single_run(config, &mut rng);

        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - Score {}, Swaps {}, Triggers {}, Deepest Cascade {}, Bombs {}, Rainbows {}",
                run_idx + 1,
                config.num_runs,
                run_stats.final_score,
                run_stats.effective_swaps,
                run_stats.manual_triggers,
                run_stats.longest_cascade,
                run_stats.bombs_spawned,
                run_stats.rainbows_spawned,
            );
        }

        all_runs.push(run_stats);
    }

    SimReport::from_runs(all_runs)
}

/// Play one session to game over.
///
/// Strategy: take the first matching swap found; if none exists the
/// board must hold a special (the engine guarantees playability), so
/// double-tap that instead.
fn simulate_single_run(config: &SimConfig, rng: &mut ChaCha8Rng) -> RunStats {
    let mut session = Session::new(config.session_config(), rng);

    while !session.game_over {
        if let Some((a, b)) = moves::find_matching_swap(&session.board) {
            session.select_cell(a.0, a.1, rng);
            session.select_cell(b.0, b.1, rng);
        } else if let Some((r, c)) = moves::find_special(&session.board) {
            session.select_cell(r, c, rng);
            session.select_cell(r, c, rng);
        } else {
            break;
        }
    }

    RunStats {
        final_score: session.score,
        moves_used: config.moves_budget - session.moves_remaining,
        effective_swaps: session.stats.effective_swaps,
        manual_triggers: session.stats.manual_triggers,
        total_passes: session.stats.total_passes,
        longest_cascade: session.stats.longest_cascade,
        ordinary_cleared: session.stats.ordinary_cleared,
        specials_cleared: session.stats.specials_cleared,
        bombs_spawned: session.stats.bombs_spawned,
        rainbows_spawned: session.stats.rainbows_spawned,
        wasted_rainbows: session.stats.wasted_rainbows,
        reshuffles: session.stats.reshuffles,
        boards_regenerated: session.stats.boards_regenerated,
    }
}
