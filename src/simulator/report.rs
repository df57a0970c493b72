//! Simulation report generation.

use std::collections::BTreeMap;

use super::runner::RunStats;

/// Score a session must reach for the companion rewards ledger to pay
/// out. Used here purely as a balance yardstick.
const REWARD_SCORE: u32 = 1000;

/// Width of one score histogram bucket.
const SCORE_BUCKET: u32 = 250;

/// Aggregated results from a simulation batch.
#[derive(Debug, Clone)]
pub struct SimReport {
    pub num_runs: u32,

    // Score statistics
    pub avg_score: f64,
    pub median_score: u32,
    pub min_score: u32,
    pub max_score: u32,
    /// Fraction of runs reaching [`REWARD_SCORE`].
    pub reward_rate: f64,

    // Cascade behavior
    pub avg_passes_per_move: f64,
    pub max_cascade: u32,
    pub avg_tiles_cleared: f64,

    // Special-tile economics, averaged per run
    pub avg_bombs: f64,
    pub avg_rainbows: f64,
    pub avg_wasted_rainbows: f64,

    // Deadlock pressure, summed over the batch
    pub total_reshuffles: u32,
    pub total_regenerations: u32,

    /// Runs per score bucket, keyed by the bucket's lower bound.
    pub score_histogram: BTreeMap<u32, u32>,

    // Individual run stats for detailed analysis
    pub run_stats: Vec<RunStats>,
}

impl SimReport {
    /// Create a report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>) -> Self {
        let num_runs = runs.len() as u32;
        let denom = (num_runs as f64).max(1.0);

        let avg_score = runs.iter().map(|r| r.final_score as f64).sum::<f64>() / denom;
        let min_score = runs.iter().map(|r| r.final_score).min().unwrap_or(0);
        let max_score = runs.iter().map(|r| r.final_score).max().unwrap_or(0);
        let median_score = {
            let mut sorted: Vec<u32> = runs.iter().map(|r| r.final_score).collect();
            sorted.sort_unstable();
            sorted.get(sorted.len() / 2).copied().unwrap_or(0)
        };
        let reward_rate = runs
            .iter()
            .filter(|r| r.final_score >= REWARD_SCORE)
            .count() as f64
            / denom;

        let total_moves: f64 = runs.iter().map(|r| r.moves_used as f64).sum();
        let total_passes: f64 = runs.iter().map(|r| r.total_passes as f64).sum();
        let avg_passes_per_move = if total_moves > 0.0 {
            total_passes / total_moves
        } else {
            0.0
        };
        let max_cascade = runs.iter().map(|r| r.longest_cascade).max().unwrap_or(0);
        let avg_tiles_cleared = runs
            .iter()
            .map(|r| (r.ordinary_cleared + r.specials_cleared) as f64)
            .sum::<f64>()
            / denom;

        let avg_bombs = runs.iter().map(|r| r.bombs_spawned as f64).sum::<f64>() / denom;
        let avg_rainbows = runs.iter().map(|r| r.rainbows_spawned as f64).sum::<f64>() / denom;
        let avg_wasted_rainbows =
            runs.iter().map(|r| r.wasted_rainbows as f64).sum::<f64>() / denom;

        let total_reshuffles = runs.iter().map(|r| r.reshuffles).sum();
        let total_regenerations = runs.iter().map(|r| r.boards_regenerated).sum();

        let mut score_histogram = BTreeMap::new();
        for run in &runs {
            let bucket = (run.final_score / SCORE_BUCKET) * SCORE_BUCKET;
            *score_histogram.entry(bucket).or_insert(0) += 1;
        }

        Self {
            num_runs,
            avg_score,
            median_score,
            min_score,
            max_score,
            reward_rate,
            avg_passes_per_move,
            max_cascade,
            avg_tiles_cleared,
            avg_bombs,
            avg_rainbows,
            avg_wasted_rainbows,
            total_reshuffles,
            total_regenerations,
            score_histogram,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("               (Greedy Bot, Real Game Engine)\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!("Runs: {}\n\n", self.num_runs));

        report.push_str("── SCORING ─────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Score:       {:.0}\n", self.avg_score));
        report.push_str(&format!("  Median Score:    {}\n", self.median_score));
        report.push_str(&format!(
            "  Min / Max:       {} / {}\n",
            self.min_score, self.max_score
        ));
        report.push_str(&format!(
            "  Reward Rate:     {:.1}% of runs reach {} points\n\n",
            self.reward_rate * 100.0,
            REWARD_SCORE
        ));

        report.push_str("── CASCADES ────────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Avg Passes/Move:   {:.2}\n",
            self.avg_passes_per_move
        ));
        report.push_str(&format!("  Deepest Cascade:   {}\n", self.max_cascade));
        report.push_str(&format!(
            "  Avg Tiles Cleared: {:.0}\n\n",
            self.avg_tiles_cleared
        ));

        report.push_str("── SPECIALS ────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Bombs:           {:.2}\n", self.avg_bombs));
        report.push_str(&format!("  Avg Rainbows:        {:.2}\n", self.avg_rainbows));
        report.push_str(&format!(
            "  Avg Wasted Rainbows: {:.2}\n\n",
            self.avg_wasted_rainbows
        ));

        report.push_str("── DEADLOCKS ───────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Reshuffles:      {}\n",
            self.total_reshuffles
        ));
        report.push_str(&format!(
            "  Regenerations:   {}\n\n",
            self.total_regenerations
        ));

        report.push_str("── SCORE DISTRIBUTION ──────────────────────────────────────────\n");
        for (bucket, count) in &self.score_histogram {
            let pct = (*count as f64 / self.num_runs as f64) * 100.0;
            let bar_len = (pct / 5.0) as usize;
            let bar: String = "█".repeat(bar_len);
            report.push_str(&format!("  {:>5}+ : {:>5.1}% {}\n", bucket, pct, bar));
        }
        report.push('\n');

        report.push_str("── BALANCE ASSESSMENT ──────────────────────────────────────────\n");
        let reward_pct = self.reward_rate * 100.0;
        let reward_rating = if reward_pct < 5.0 {
            "TOO STINGY - Rewards nearly unreachable"
        } else if reward_pct < 35.0 {
            "GOOD - Rewards earned, not given"
        } else if reward_pct < 75.0 {
            "GENEROUS - Most sessions pay out"
        } else {
            "TOO EASY - Rewards are a formality"
        };
        report.push_str(&format!("  Reward Rating:   {}\n", reward_rating));

        if self.avg_wasted_rainbows > 0.5 {
            report.push_str("  ⚠️  Rainbows fizzle often - palette too wide for the board?\n");
        }
        if self.avg_passes_per_move > 3.0 {
            report.push_str("  ⚠️  Deep cascades dominate - scores may be luck-driven\n");
        }
        if self.total_regenerations > 0 {
            report.push_str(&format!(
                "  ⚠️  {} board regeneration(s) - reshuffle cap was exhausted\n",
                self.total_regenerations
            ));
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

// Serialize the aggregates only; per-run stats stay in memory.
impl serde::Serialize for SimReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("SimReport", 15)?;
        state.serialize_field("num_runs", &self.num_runs)?;
        state.serialize_field("avg_score", &self.avg_score)?;
        state.serialize_field("median_score", &self.median_score)?;
        state.serialize_field("min_score", &self.min_score)?;
        state.serialize_field("max_score", &self.max_score)?;
        state.serialize_field("reward_rate", &self.reward_rate)?;
        state.serialize_field("avg_passes_per_move", &self.avg_passes_per_move)?;
        state.serialize_field("max_cascade", &self.max_cascade)?;
        state.serialize_field("avg_tiles_cleared", &self.avg_tiles_cleared)?;
        state.serialize_field("avg_bombs", &self.avg_bombs)?;
        state.serialize_field("avg_rainbows", &self.avg_rainbows)?;
        state.serialize_field("avg_wasted_rainbows", &self.avg_wasted_rainbows)?;
        state.serialize_field("total_reshuffles", &self.total_reshuffles)?;
        state.serialize_field("total_regenerations", &self.total_regenerations)?;
        state.serialize_field("score_histogram", &self.score_histogram)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_with(score: u32, passes: u32) -> RunStats {
        RunStats {
            final_score: score,
            moves_used: 20,
            effective_swaps: 18,
            manual_triggers: 2,
            total_passes: passes,
            longest_cascade: 3,
            ordinary_cleared: 110,
            specials_cleared: 2,
            bombs_spawned: 2,
            rainbows_spawned: 1,
            wasted_rainbows: 0,
            reshuffles: 0,
            boards_regenerated: 0,
        }
    }

    #[test]
    fn test_report_aggregation() {
        let report = SimReport::from_runs(vec![run_with(600, 25), run_with(1400, 30)]);

        assert_eq!(report.num_runs, 2);
        assert!((report.avg_score - 1000.0).abs() < 0.1);
        assert_eq!(report.min_score, 600);
        assert_eq!(report.max_score, 1400);
        assert!((report.reward_rate - 0.5).abs() < 1e-9);
        assert!((report.avg_passes_per_move - 55.0 / 40.0).abs() < 1e-9);
        assert_eq!(report.score_histogram.get(&500), Some(&1));
        assert_eq!(report.score_histogram.get(&1250), Some(&1));
    }

    #[test]
    fn test_empty_batch_reports_zeros() {
        let report = SimReport::from_runs(Vec::new());

        assert_eq!(report.num_runs, 0);
        assert_eq!(report.avg_score, 0.0);
        assert_eq!(report.max_score, 0);
        assert!(report.score_histogram.is_empty());
    }

    #[test]
    fn test_text_report_has_the_key_sections() {
        let report = SimReport::from_runs(vec![run_with(600, 25)]);
        let text = report.to_text();

        assert!(text.contains("SIMULATION REPORT"));
        assert!(text.contains("SCORING"));
        assert!(text.contains("SPECIALS"));
        assert!(text.contains("SCORE DISTRIBUTION"));
        assert!(text.contains("BALANCE ASSESSMENT"));
    }

    #[test]
    fn test_json_report_omits_per_run_stats() {
        let report = SimReport::from_runs(vec![run_with(600, 25), run_with(1400, 30)]);
        let json = report.to_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["num_runs"], 2);
        assert_eq!(value["median_score"], 1400);
        assert!(value.get("run_stats").is_none());
    }
}
