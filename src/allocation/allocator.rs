//! Per-party Gaussian allocation of a constituency's vote share.
//!
//! One repetition:
//! 1. Start from a full budget and a random party order; run one pass on the
//!    initial ladder.
//! 2. While more than 1.0 point is left, run refill passes over the same
//!    order on the rescaled ladder. A refill pass that claims nothing at all
//!    ends the loop early: no later pass could claim more.
//! 3. Split the leftover evenly across all parties and sum each party's
//!    claims.
//!
//! Ten repetitions are averaged, and whatever the average is short of 100 is
//! spread back across the parties.

use super::budget::PercentageBudget;
use super::pass::{AllocationPass, AllocationState};
use super::reducer::repeat_and_average;
use super::sampling::{GaussianSampler, Ladder, PartyParameters};
use crate::constants::{
    LEGACY_CORRECTION_PARTIES, REPETITIONS_PER_CONSTITUENCY, RESIDUAL_THRESHOLD_UNITS,
    TOTAL_PERCENT,
};
use crate::error::{ElectionError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How the shortfall of the averaged shares is spread back across parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResidualCorrection {
    /// `diff / n_parties` to each party; the total is always 100.
    #[default]
    EvenSplit,
    /// `diff / 3` to each party. Only totals 100 when there are three
    /// parties; kept to reproduce historical results.
    LegacyThirds,
}

impl ResidualCorrection {
    fn divisor(self, n_parties: usize) -> f64 {
        match self {
            ResidualCorrection::EvenSplit => n_parties as f64,
            ResidualCorrection::LegacyThirds => LEGACY_CORRECTION_PARTIES,
        }
    }
}

/// Adds the shortfall `100 - sum(shares)` back onto every share and returns it.
pub fn correct_residual(shares: &mut [f64], correction: ResidualCorrection) -> f64 {
    let diff = TOTAL_PERCENT - shares.iter().sum::<f64>();
    if diff != 0.0 && !shares.is_empty() {
        let adjustment = diff / correction.divisor(shares.len());
        for share in shares.iter_mut() {
            *share += adjustment;
        }
    }
    diff
}

/// Allocates vote share among parties with individual `(mean, stdev)`.
#[derive(Debug, Clone)]
pub struct PartyAllocator {
    params: Vec<PartyParameters>,
    repetitions: usize,
    correction: ResidualCorrection,
}

/// One repetition before the residual is split.
#[derive(Debug, Clone, PartialEq)]
struct Repetition {
    totals: Vec<f64>,
    residual: f64,
    refill_passes: u32,
}

impl PartyAllocator {
    pub fn new(params: Vec<PartyParameters>) -> Result<Self> {
        if params.len() < 2 {
            return Err(ElectionError::invalid_parameters(format!(
                "at least 2 parties are required, got {}",
                params.len()
            )));
        }
        for p in &params {
            p.validate()?;
        }
        if params.iter().all(PartyParameters::is_degenerate) {
            return Err(ElectionError::invalid_parameters(
                "every party has mean 0 and stdev 0; the budget can never be claimed",
            ));
        }

        Ok(Self {
            params,
            repetitions: REPETITIONS_PER_CONSTITUENCY,
            correction: ResidualCorrection::default(),
        })
    }

    pub fn with_correction(mut self, correction: ResidualCorrection) -> Self {
        self.correction = correction;
        self
    }

    pub fn with_repetitions(mut self, repetitions: usize) -> Self {
        self.repetitions = repetitions;
        self
    }

    /// Averaged and corrected share vector (`percent_arr`).
    pub fn allocate(&self, rng: &mut impl Rng) -> Result<Vec<f64>> {
        let mut sampler = GaussianSampler::new();
        let mut shares = repeat_and_average(self.repetitions, |_| {
            self.allocate_with(&mut sampler, &mut *rng)
        })?;

        let diff = correct_residual(&mut shares, self.correction);
        debug!(diff, correction = ?self.correction, "corrected averaged shares");
        Ok(shares)
    }

    /// A single repetition: one share per party, summing to 100.
    pub fn allocate_once(&self, rng: &mut impl Rng) -> Result<Vec<f64>> {
        self.allocate_with(&mut GaussianSampler::new(), rng)
    }

    fn allocate_with(
        &self,
        sampler: &mut GaussianSampler,
        rng: &mut impl Rng,
    ) -> Result<Vec<f64>> {
        let repetition = self.run_repetition(sampler, rng)?;
        let residual_share = repetition.residual / self.params.len() as f64;
        Ok(repetition
            .totals
            .into_iter()
            .map(|total| total + residual_share)
            .collect())
    }

    fn run_repetition(
        &self,
        sampler: &mut GaussianSampler,
        rng: &mut impl Rng,
    ) -> Result<Repetition> {
        let n_parties = self.params.len();
        let mut budget = PercentageBudget::new();
        let mut state = AllocationState::new(n_parties);

        let mut order: Vec<usize> = (0..n_parties).collect();
        order.shuffle(rng);

        let first = AllocationPass {
            order: &order,
            params: &self.params,
            ladder: Ladder::Initial,
        };
        first.run(&mut budget, &mut state, sampler, rng)?;

        let refill = AllocationPass {
            ladder: Ladder::Rescaled,
            ..first
        };
        let mut refill_passes: u32 = 0;
        while budget.remaining_units() > RESIDUAL_THRESHOLD_UNITS {
            let before = budget.remaining_units();
            refill.run(&mut budget, &mut state, sampler, rng)?;
            refill_passes = refill_passes.saturating_add(1);

            // Every draw rounded to zero: the scaled means are below the grid
            if budget.remaining_units() == before {
                warn!(
                    refill_passes,
                    remaining = budget.remaining(),
                    "refill pass claimed nothing, splitting what is left"
                );
                break;
            }
        }

        let residual = budget.drain();
        debug!(refill_passes, residual, "repetition converged");

        Ok(Repetition {
            totals: state.totals(),
            residual,
            refill_passes,
        })
    }
}
