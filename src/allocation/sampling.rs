//! Candidate vote-share draws and the escalation ladder.
//!
//! A draw takes a pool of Gaussian samples, clamps negatives to zero, picks
//! one of them at random and rounds it to the 0.0001 grid. When a party keeps
//! drawing more than the budget can cover, the ladder shrinks the
//! distribution parameters until a feasible value comes up.

use super::budget::round_to_grid;
use crate::constants::{
    INITIAL_DAMP_AFTER, INITIAL_SCALE_AFTER, RESCALED_DAMP_AFTER, SAMPLE_POOL_SIZE, TOTAL_PERCENT,
};
use crate::error::{ElectionError, Result};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Mean and standard deviation of one party's vote share, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartyParameters {
    pub mean: f64,
    pub stdev: f64,
}

impl PartyParameters {
    pub fn new(mean: f64, stdev: f64) -> Result<Self> {
        let params = Self { mean, stdev };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.mean.is_finite() || self.mean < 0.0 {
            return Err(ElectionError::invalid_parameters(format!(
                "mean must be a finite value >= 0, got {}",
                self.mean
            )));
        }
        if !self.stdev.is_finite() || self.stdev < 0.0 {
            return Err(ElectionError::invalid_parameters(format!(
                "stdev must be a finite value >= 0, got {}",
                self.stdev
            )));
        }
        Ok(())
    }

    /// A (0, 0) party can never claim any share.
    pub fn is_degenerate(&self) -> bool {
        self.mean == 0.0 && self.stdev == 0.0
    }
}

impl From<(f64, f64)> for PartyParameters {
    fn from((mean, stdev): (f64, f64)) -> Self {
        Self { mean, stdev }
    }
}

/// How a party's parameters are shaped for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationPolicy {
    /// Party parameters as given.
    Unscaled,
    /// Parameters scaled by `remaining / 100`.
    Scaled,
    /// Scaled parameters further divided by the attempt count.
    ScaledDamped,
}

impl EscalationPolicy {
    /// Returns the `(mean, stdev)` to sample from on attempt `count`.
    pub fn parameters(self, party: PartyParameters, remaining: f64, count: u32) -> (f64, f64) {
        let scale = remaining / TOTAL_PERCENT;
        match self {
            EscalationPolicy::Unscaled => (party.mean, party.stdev),
            EscalationPolicy::Scaled => (party.mean * scale, party.stdev * scale),
            EscalationPolicy::ScaledDamped => {
                let damping = count.max(1) as f64;
                (
                    party.mean * scale / damping,
                    party.stdev * scale / damping,
                )
            }
        }
    }
}

/// Which sequence of policies a pass escalates through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ladder {
    /// First pass of a repetition: unscaled, then scaled, then damped.
    Initial,
    /// Refill passes: always scaled, damped once attempts pile up.
    Rescaled,
}

impl Ladder {
    pub fn policy(self, count: u32) -> EscalationPolicy {
        match self {
            Ladder::Initial if count < INITIAL_SCALE_AFTER => EscalationPolicy::Unscaled,
            Ladder::Initial if count < INITIAL_DAMP_AFTER => EscalationPolicy::Scaled,
            Ladder::Initial => EscalationPolicy::ScaledDamped,
            Ladder::Rescaled if count < RESCALED_DAMP_AFTER => EscalationPolicy::Scaled,
            Ladder::Rescaled => EscalationPolicy::ScaledDamped,
        }
    }
}

/// Draws candidate shares from a reusable pool of Gaussian samples.
#[derive(Debug, Clone)]
pub struct GaussianSampler {
    pool: Vec<f64>,
    pool_size: usize,
}

impl Default for GaussianSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl GaussianSampler {
    pub fn new() -> Self {
        Self::with_pool_size(SAMPLE_POOL_SIZE)
    }

    pub fn with_pool_size(pool_size: usize) -> Self {
        let pool_size = pool_size.max(1);
        Self {
            pool: Vec::with_capacity(pool_size),
            pool_size,
        }
    }

    /// One candidate share: clamped at zero and rounded to 4 decimals.
    ///
    /// A zero `stdev` yields the clamped mean without touching `rng`.
    pub fn draw(&mut self, mean: f64, stdev: f64, rng: &mut impl Rng) -> Result<f64> {
        if !mean.is_finite() || !stdev.is_finite() || stdev < 0.0 {
            return Err(ElectionError::invalid_parameters(format!(
                "normal({mean}, {stdev}): mean must be finite and stdev finite and non-negative"
            )));
        }
        if stdev == 0.0 {
            return Ok(round_to_grid(mean.max(0.0)));
        }

        let normal = Normal::new(mean, stdev).map_err(|e| {
            ElectionError::invalid_parameters(format!("normal({mean}, {stdev}): {e}"))
        })?;

        self.pool.clear();
        for _ in 0..self.pool_size {
            let sample: f64 = normal.sample(rng);
            self.pool.push(sample.max(0.0));
        }

        let picked = self.pool[rng.gen_range(0..self.pool.len())];
        Ok(round_to_grid(picked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_initial_ladder_thresholds() {
        assert_eq!(Ladder::Initial.policy(0), EscalationPolicy::Unscaled);
        assert_eq!(Ladder::Initial.policy(19), EscalationPolicy::Unscaled);
        assert_eq!(Ladder::Initial.policy(20), EscalationPolicy::Scaled);
        assert_eq!(Ladder::Initial.policy(49), EscalationPolicy::Scaled);
        assert_eq!(Ladder::Initial.policy(50), EscalationPolicy::ScaledDamped);
        assert_eq!(Ladder::Initial.policy(5000), EscalationPolicy::ScaledDamped);
    }

    #[test]
    fn test_rescaled_ladder_thresholds() {
        assert_eq!(Ladder::Rescaled.policy(0), EscalationPolicy::Scaled);
        assert_eq!(Ladder::Rescaled.policy(29), EscalationPolicy::Scaled);
        assert_eq!(Ladder::Rescaled.policy(30), EscalationPolicy::ScaledDamped);
    }

    #[test]
    fn test_policy_parameters() {
        let party = PartyParameters::new(40.0, 8.0).unwrap();

        assert_eq!(
            EscalationPolicy::Unscaled.parameters(party, 25.0, 3),
            (40.0, 8.0)
        );
        assert_eq!(
            EscalationPolicy::Scaled.parameters(party, 25.0, 25),
            (10.0, 2.0)
        );
        assert_eq!(
            EscalationPolicy::ScaledDamped.parameters(party, 25.0, 50),
            (0.2, 0.04)
        );
    }

    #[test]
    fn test_damped_parameters_shrink_with_count() {
        let party = PartyParameters::new(30.0, 5.0).unwrap();
        let (m60, s60) = EscalationPolicy::ScaledDamped.parameters(party, 10.0, 60);
        let (m90, s90) = EscalationPolicy::ScaledDamped.parameters(party, 10.0, 90);
        assert!(m90 < m60);
        assert!(s90 < s60);
    }

    #[test]
    fn test_party_parameters_validation() {
        assert!(PartyParameters::new(10.0, 2.0).is_ok());
        assert!(PartyParameters::new(0.0, 0.0).is_ok());
        assert!(PartyParameters::new(-1.0, 2.0).is_err());
        assert!(PartyParameters::new(10.0, -0.5).is_err());
        assert!(PartyParameters::new(f64::NAN, 1.0).is_err());
        assert!(PartyParameters::new(0.0, 0.0).unwrap().is_degenerate());
    }

    #[test]
    fn test_draws_are_non_negative_and_on_grid() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut sampler = GaussianSampler::new();
        for _ in 0..50 {
            let value = sampler.draw(1.0, 5.0, &mut rng).unwrap();
            assert!(value >= 0.0);
            assert_eq!(value, round_to_grid(value));
        }
    }

    #[test]
    fn test_zero_stdev_draw_is_mean() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut sampler = GaussianSampler::with_pool_size(10);
        assert_eq!(sampler.draw(12.3456, 0.0, &mut rng).unwrap(), 12.3456);
    }

    #[test]
    fn test_draw_rejects_negative_stdev() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut sampler = GaussianSampler::new();
        assert!(matches!(
            sampler.draw(10.0, -1.0, &mut rng),
            Err(ElectionError::InvalidParameters(_))
        ));
        assert!(sampler.draw(10.0, f64::NAN, &mut rng).is_err());
        assert!(sampler.draw(f64::INFINITY, 1.0, &mut rng).is_err());
        assert!(sampler.draw(10.0, f64::INFINITY, &mut rng).is_err());
    }

    #[test]
    fn test_zero_stdev_draw_leaves_rng_untouched() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut sampler = GaussianSampler::new();
        assert_eq!(sampler.draw(-3.0, 0.0, &mut rng).unwrap(), 0.0);
        assert_eq!(
            rng.gen::<u64>(),
            ChaCha8Rng::seed_from_u64(7).gen::<u64>()
        );
    }

    #[test]
    fn test_draws_track_the_mean() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let mut sampler = GaussianSampler::with_pool_size(100);
        let draws: Vec<f64> = (0..400)
            .map(|_| sampler.draw(30.0, 3.0, &mut rng).unwrap())
            .collect();
        let avg = draws.iter().sum::<f64>() / draws.len() as f64;
        assert!((avg - 30.0).abs() < 1.0, "average draw {avg}");
    }
}
