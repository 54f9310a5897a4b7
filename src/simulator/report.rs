//! Simulation report generation.

use super::config::SimConfig;
use super::runner::RunningTotals;
use crate::election::ElectionModel;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregated results from a simulation.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub model: ElectionModel,
    pub n_parties: usize,
    pub constituencies: usize,
    pub iterations: u32,
    pub num_runs: u64,

    // Averaged over constituencies x iterations
    pub avg_percent_dropped: f64,
    pub avg_percent_arr: Vec<f64>,

    // Averaged over iterations only: voters across every constituency of a run
    pub vote_distribution: BTreeMap<String, f64>,

    // Individual run results for detailed analysis
    pub dropped_per_run: Vec<f64>,
}

impl SimReport {
    pub(crate) fn from_totals(config: &SimConfig, totals: RunningTotals) -> Self {
        let constituencies = config.constituency_sizes.len();
        let runs_divisor = (constituencies as u64 * config.iterations as u64).max(1) as f64;
        let iterations_divisor = config.iterations.max(1) as f64;

        let avg_percent_arr = totals
            .percent_arr
            .iter()
            .map(|sum| sum / runs_divisor)
            .collect();
        let vote_distribution = totals
            .vote_distribution
            .into_iter()
            .map(|(party, votes)| (party, votes / iterations_divisor))
            .collect();

        Self {
            model: config.model.clone(),
            n_parties: config.n_parties,
            constituencies,
            iterations: config.iterations,
            num_runs: totals.runs,
            avg_percent_dropped: totals.percent_dropped / runs_divisor,
            avg_percent_arr,
            vote_distribution,
            dropped_per_run: totals.dropped_per_run,
        }
    }

    pub fn min_dropped(&self) -> f64 {
        self.dropped_per_run
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min)
    }

    pub fn max_dropped(&self) -> f64 {
        self.dropped_per_run
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn median_dropped(&self) -> f64 {
        let mut sorted = self.dropped_per_run.clone();
        sorted.sort_by(f64::total_cmp);
        sorted.get(sorted.len() / 2).copied().unwrap_or(0.0)
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    DROPPED VOTE REPORT\n");
        report.push_str("                 (First Past The Post)\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Model: {}, {} parties\n",
            self.model.label(),
            self.n_parties
        ));
        report.push_str(&format!(
            "Runs: {} total ({} constituencies x {} iterations)\n\n",
            self.num_runs, self.constituencies, self.iterations
        ));

        report.push_str("── DROPPED VOTES ────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Avg Dropped:     {:.2}%\n",
            self.avg_percent_dropped
        ));
        if !self.dropped_per_run.is_empty() {
            report.push_str(&format!("  Min Dropped:     {:.2}%\n", self.min_dropped()));
            report.push_str(&format!(
                "  Median Dropped:  {:.2}%\n",
                self.median_dropped()
            ));
            report.push_str(&format!("  Max Dropped:     {:.2}%\n", self.max_dropped()));
        }
        report.push('\n');

        report.push_str("── PARTY SHARES ─────────────────────────────────────────────────\n");
        report.push_str("  Party      Avg Share    Votes/Iteration\n");
        report.push_str("  ─────      ─────────    ───────────────\n");
        for (party, share) in self.avg_percent_arr.iter().enumerate() {
            let key = crate::election::party_key(party);
            let votes = self.vote_distribution.get(&key).copied().unwrap_or(0.0);
            let bar: String = "█".repeat((share / 5.0).max(0.0) as usize);
            report.push_str(&format!(
                "  {:<9}  {:>7.2}%    {:>15.0}  {}\n",
                key, share, votes, bar
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
