//! Runs one constituency's election and measures the dropped vote.

use super::distribution::vote_distribution;
use super::model::{Election, ElectionModel};
use crate::allocation::{
    AllocationPass, AllocationState, GaussianSampler, Ladder, PartyAllocator, PartyParameters,
    PercentageBudget,
};
use crate::constants::{TOTAL_PERCENT, UNIFORM_MIN_DRAW, UNITS_PER_POINT};
use crate::error::Result;
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;

/// Final shares of one constituency and what they imply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElectionOutcome {
    /// `100 - max(percent_arr)`: every vote not cast for the winner.
    pub percent_dropped: f64,
    pub percent_arr: Vec<f64>,
    pub vote_distribution: BTreeMap<String, f64>,
}

impl ElectionOutcome {
    pub fn from_shares(percent_arr: Vec<f64>, n_constituents: u64) -> Self {
        let percent_dropped = percent_dropped(&percent_arr);
        let vote_distribution = vote_distribution(&percent_arr, n_constituents);
        Self {
            percent_dropped,
            percent_arr,
            vote_distribution,
        }
    }

    pub fn winner(&self) -> Option<usize> {
        self.percent_arr
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(party, _)| party)
    }
}

/// `100 - max(shares)`.
pub fn percent_dropped(shares: &[f64]) -> f64 {
    TOTAL_PERCENT - shares.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// What a run reports: the dropped percentage alone, or everything.
#[derive(Debug, Clone, PartialEq)]
pub enum RunResult {
    Dropped(f64),
    Detailed(ElectionOutcome),
}

impl RunResult {
    fn new(outcome: ElectionOutcome, verbose: bool) -> Self {
        if verbose {
            RunResult::Detailed(outcome)
        } else {
            RunResult::Dropped(outcome.percent_dropped)
        }
    }

    pub fn percent_dropped(&self) -> f64 {
        match self {
            RunResult::Dropped(dropped) => *dropped,
            RunResult::Detailed(outcome) => outcome.percent_dropped,
        }
    }

    pub fn outcome(&self) -> Option<&ElectionOutcome> {
        match self {
            RunResult::Dropped(_) => None,
            RunResult::Detailed(outcome) => Some(outcome),
        }
    }
}

/// Runs `election` once with the variant its model selects.
pub fn run_election(election: &Election, rng: &mut impl Rng) -> Result<ElectionOutcome> {
    election.validate()?;

    let shares = match &election.model {
        ElectionModel::Uniform => uniform_shares(election.n_parties, rng)?,
        ElectionModel::SingleGaussian { mean, stdev } => {
            let params = PartyParameters::new(*mean, *stdev)?;
            single_gaussian_shares(election.n_parties, params, rng)?
        }
        ElectionModel::PerPartyGaussian { params } => PartyAllocator::new(params.clone())?
            .with_correction(election.residual_correction)
            .allocate(rng)?,
    };

    Ok(ElectionOutcome::from_shares(shares, election.n_constituents))
}

pub fn run_uniform(
    n_parties: usize,
    n_constituents: u64,
    verbose: bool,
    rng: &mut impl Rng,
) -> Result<RunResult> {
    let election = Election::uniform(n_parties, n_constituents)?;
    Ok(RunResult::new(run_election(&election, rng)?, verbose))
}

pub fn run_gaussian(
    n_parties: usize,
    n_constituents: u64,
    mean: f64,
    stdev: f64,
    verbose: bool,
    rng: &mut impl Rng,
) -> Result<RunResult> {
    let election = Election::gaussian(n_parties, n_constituents, mean, stdev)?;
    Ok(RunResult::new(run_election(&election, rng)?, verbose))
}

pub fn run_party_specific(
    n_parties: usize,
    n_constituents: u64,
    party_parameters: &[PartyParameters],
    verbose: bool,
    rng: &mut impl Rng,
) -> Result<RunResult> {
    let election = Election::party_specific(n_parties, n_constituents, party_parameters.to_vec())?;
    Ok(RunResult::new(run_election(&election, rng)?, verbose))
}

/// Whole-point shares drawn uniformly from `[1, remaining]`.
pub fn uniform_shares(n_parties: usize, rng: &mut impl Rng) -> Result<Vec<f64>> {
    uniform_shares_with(n_parties, |max| rng.gen_range(UNIFORM_MIN_DRAW..=max))
}

/// Parties in index order take `draw(remaining_points)` until the budget is
/// gone; the last party takes whatever is left.
pub fn uniform_shares_with<F>(n_parties: usize, mut draw: F) -> Result<Vec<f64>>
where
    F: FnMut(u32) -> u32,
{
    let mut budget = PercentageBudget::new();
    let mut shares = vec![0.0; n_parties];

    if let Some((last, leading)) = shares.split_last_mut() {
        for share in leading {
            let remaining_points = budget.remaining_units() / UNITS_PER_POINT;
            if remaining_points < UNIFORM_MIN_DRAW {
                break;
            }
            let drawn = draw(remaining_points) as f64;
            budget.consume(drawn)?;
            *share = drawn;
        }
        *last = budget.drain();
    }

    Ok(shares)
}

/// One pass with a shared `(mean, stdev)` over every party but the last,
/// which takes the remainder.
pub fn single_gaussian_shares(
    n_parties: usize,
    params: PartyParameters,
    rng: &mut impl Rng,
) -> Result<Vec<f64>> {
    let mut budget = PercentageBudget::new();
    let mut state = AllocationState::new(n_parties);
    let order: Vec<usize> = (0..n_parties.saturating_sub(1)).collect();
    let shared = vec![params; n_parties];

    AllocationPass {
        order: &order,
        params: &shared,
        ladder: Ladder::Initial,
    }
    .run(&mut budget, &mut state, &mut GaussianSampler::new(), rng)?;

    if let Some(last) = n_parties.checked_sub(1) {
        state.record(last, budget.drain())?;
    }
    Ok(state.totals())
}
