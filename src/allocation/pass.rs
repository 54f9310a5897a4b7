//! One sweep over the parties, each claiming a feasible share of the budget.

use super::budget::PercentageBudget;
use super::sampling::{GaussianSampler, Ladder, PartyParameters};
use crate::error::{ElectionError, Result};
use rand::Rng;
use tracing::trace;

/// Shares claimed by each party, in claim order, across every pass of one
/// repetition.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationState {
    draws: Vec<Vec<f64>>,
}

impl AllocationState {
    pub fn new(n_parties: usize) -> Self {
        Self {
            draws: vec![Vec::new(); n_parties],
        }
    }

    pub fn record(&mut self, party: usize, share: f64) -> Result<()> {
        let n_parties = self.draws.len();
        let draws = self.draws.get_mut(party).ok_or_else(|| {
            ElectionError::invalid_parameters(format!(
                "party index {party} out of range for {n_parties} parties"
            ))
        })?;
        draws.push(share);
        Ok(())
    }

    pub fn draws(&self, party: usize) -> &[f64] {
        self.draws.get(party).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Per-party sum of every claimed share.
    pub fn totals(&self) -> Vec<f64> {
        self.draws.iter().map(|d| d.iter().sum()).collect()
    }
}

/// A pass visits `order` once, giving each party one feasible claim.
#[derive(Debug, Clone, Copy)]
pub struct AllocationPass<'a> {
    pub order: &'a [usize],
    pub params: &'a [PartyParameters],
    pub ladder: Ladder,
}

impl AllocationPass<'_> {
    pub fn run(
        &self,
        budget: &mut PercentageBudget,
        state: &mut AllocationState,
        sampler: &mut GaussianSampler,
        rng: &mut impl Rng,
    ) -> Result<()> {
        for &party in self.order {
            let params = self.params.get(party).copied().ok_or_else(|| {
                ElectionError::invalid_parameters(format!("no parameters for party {party}"))
            })?;
            let share = self.draw_feasible(party, params, budget, sampler, rng)?;
            budget.consume(share)?;
            state.record(party, share)?;
        }
        Ok(())
    }

    /// Retries until a draw fits in the budget. No retry cap: past the damping
    /// threshold the parameters shrink with every attempt.
    fn draw_feasible(
        &self,
        party: usize,
        params: PartyParameters,
        budget: &PercentageBudget,
        sampler: &mut GaussianSampler,
        rng: &mut impl Rng,
    ) -> Result<f64> {
        let remaining = budget.remaining();
        let mut count: u32 = 0;
        let mut policy = self.ladder.policy(count);

        loop {
            let (mean, stdev) = policy.parameters(params, remaining, count);
            let candidate = sampler.draw(mean, stdev, rng)?;
            if budget.feasible(candidate) {
                return Ok(candidate);
            }

            count = count.saturating_add(1);
            let next = self.ladder.policy(count);
            if next != policy {
                trace!(party, count, remaining, ?next, "escalating sampling policy");
                policy = next;
            }
        }
    }
}
