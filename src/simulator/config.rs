//! Simulation configuration.

use crate::allocation::{PartyParameters, ResidualCorrection};
use crate::election::ElectionModel;

/// Six-party reference distribution as `(mean, stdev)` pairs.
pub const REFERENCE_SIX_PARTY: [(f64, f64); 6] = [
    (16.0, 5.0),
    (6.5, 2.0),
    (1.6, 0.4),
    (33.0, 7.0),
    (34.0, 8.0),
    (7.6, 2.0),
];

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Parties contesting every constituency
    pub n_parties: usize,

    /// Voters in each simulated constituency
    pub constituency_sizes: Vec<u64>,

    /// Times the whole set of constituencies is simulated
    pub iterations: u32,

    /// How vote shares are generated
    pub model: ElectionModel,

    /// Shortfall handling for per-party Gaussian shares
    pub residual_correction: ResidualCorrection,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Log verbosity (0 = silent, 1 = summary, 2 = detailed)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            n_parties: 3,
            constituency_sizes: vec![50_000, 75_000, 100_000],
            iterations: 100,
            model: ElectionModel::Uniform,
            residual_correction: ResidualCorrection::default(),
            seed: None,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Per-party Gaussian over the six-party reference distribution
    pub fn reference_six_party(iterations: u32) -> Self {
        Self {
            n_parties: REFERENCE_SIX_PARTY.len(),
            iterations,
            model: ElectionModel::PerPartyGaussian {
                params: REFERENCE_SIX_PARTY
                    .iter()
                    .copied()
                    .map(PartyParameters::from)
                    .collect(),
            },
            ..Default::default()
        }
    }

    /// Quick config for smoke-testing a model
    pub fn quick(model: ElectionModel, n_parties: usize) -> Self {
        Self {
            n_parties,
            constituency_sizes: vec![10_000],
            iterations: 5,
            model,
            ..Default::default()
        }
    }

    /// Runs folded into the report.
    pub fn total_runs(&self) -> u64 {
        self.constituency_sizes.len() as u64 * self.iterations as u64
    }
}
