//! Monte Carlo balance simulator.
//!
//! Plays batches of full sessions with a simple greedy bot to analyze:
//! - Score distribution across a fixed move budget
//! - Cascade depth and tiles cleared per move
//! - Special-tile economics (bombs, rainbows, wasted rainbows)
//! - Deadlock pressure (reshuffle and regeneration counts)
//!
//! The simulator drives the real Session and resolution engine, so its
//! numbers match live gameplay behavior exactly.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::SimReport;
pub use runner::{run_simulation, RunStats};
