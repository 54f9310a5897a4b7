//! Aggregates single-constituency elections over many constituencies and
//! iterations.
//!
//! Every run gets its own RNG stream, so a seeded simulation is reproducible
//! run by run. Statistics are folded into running totals as runs finish; the
//! first failing run aborts the whole simulation.

use super::config::SimConfig;
use super::report::SimReport;
use crate::election::{run_election, Election, ElectionOutcome};
use crate::error::{ElectionError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use tracing::info;

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> Result<SimReport> {
    if config.constituency_sizes.is_empty() || config.iterations == 0 {
        return Err(ElectionError::invalid_parameters(
            "a simulation needs at least one constituency and one iteration",
        ));
    }

    let mut election = Election::new(config.n_parties, 0, config.model.clone())?
        .with_residual_correction(config.residual_correction);
    let mut totals = RunningTotals::new(config.n_parties);
    let total_runs = config.total_runs();
    info!(
        model = config.model.label(),
        n_parties = config.n_parties,
        total_runs,
        seed = ?config.seed,
        "starting simulation"
    );

    for iteration in 0..config.iterations {
        for &size in &config.constituency_sizes {
            // Create RNG for this run
            let mut rng = run_rng(config.seed, totals.runs);

            election.n_constituents = size;
            let outcome = run_election(&election, &mut rng)?;

            if config.verbosity >= 2 {
                println!(
                    "Run {}/{} - Iteration {}, Constituents {}, Dropped {:.2}%, Winner {:.2}%",
                    totals.runs + 1,
                    total_runs,
                    iteration + 1,
                    size,
                    outcome.percent_dropped,
                    100.0 - outcome.percent_dropped
                );
            }

            totals.add(&outcome);
        }
    }

    let report = SimReport::from_totals(config, totals);
    info!(
        runs = report.num_runs,
        avg_percent_dropped = report.avg_percent_dropped,
        "simulation finished"
    );
    Ok(report)
}

/// `seed + run_index` when seeded, entropy otherwise.
pub fn run_rng(seed: Option<u64>, run_index: u64) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(run_index)),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Running sums across runs.
#[derive(Debug, Clone)]
pub(crate) struct RunningTotals {
    pub runs: u64,
    pub percent_dropped: f64,
    pub percent_arr: Vec<f64>,
    pub vote_distribution: BTreeMap<String, f64>,
    pub dropped_per_run: Vec<f64>,
}

impl RunningTotals {
    fn new(n_parties: usize) -> Self {
        Self {
            runs: 0,
            percent_dropped: 0.0,
            percent_arr: vec![0.0; n_parties],
            vote_distribution: BTreeMap::new(),
            dropped_per_run: Vec::new(),
        }
    }

    fn add(&mut self, outcome: &ElectionOutcome) {
        self.runs += 1;
        self.percent_dropped += outcome.percent_dropped;
        for (sum, share) in self.percent_arr.iter_mut().zip(&outcome.percent_arr) {
            *sum += share;
        }
        for (party, votes) in &outcome.vote_distribution {
            *self.vote_distribution.entry(party.clone()).or_insert(0.0) += votes;
        }
        self.dropped_per_run.push(outcome.percent_dropped);
    }
}
