//! Election configuration for one constituency.

use crate::allocation::{PartyParameters, ResidualCorrection};
use crate::error::{ElectionError, Result};
use serde::{Deserialize, Serialize};

/// How vote shares are generated. Chosen once when the election is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElectionModel {
    /// Whole-point shares drawn uniformly from what is left. Deliberately
    /// crude; used when no distribution parameters are given.
    Uniform,
    /// Every party shares one `(mean, stdev)`.
    SingleGaussian { mean: f64, stdev: f64 },
    /// One `(mean, stdev)` per party.
    PerPartyGaussian { params: Vec<PartyParameters> },
}

impl ElectionModel {
    pub fn label(&self) -> &'static str {
        match self {
            ElectionModel::Uniform => "uniform",
            ElectionModel::SingleGaussian { .. } => "single gaussian",
            ElectionModel::PerPartyGaussian { .. } => "per-party gaussian",
        }
    }
}

/// A validated single-constituency election.
#[derive(Debug, Clone, PartialEq)]
pub struct Election {
    pub n_parties: usize,
    pub n_constituents: u64,
    pub model: ElectionModel,
    pub residual_correction: ResidualCorrection,
}

impl Election {
    pub fn new(n_parties: usize, n_constituents: u64, model: ElectionModel) -> Result<Self> {
        let election = Self {
            n_parties,
            n_constituents,
            model,
            residual_correction: ResidualCorrection::default(),
        };
        election.validate()?;
        Ok(election)
    }

    pub fn uniform(n_parties: usize, n_constituents: u64) -> Result<Self> {
        Self::new(n_parties, n_constituents, ElectionModel::Uniform)
    }

    pub fn gaussian(n_parties: usize, n_constituents: u64, mean: f64, stdev: f64) -> Result<Self> {
        Self::new(
            n_parties,
            n_constituents,
            ElectionModel::SingleGaussian { mean, stdev },
        )
    }

    pub fn party_specific(
        n_parties: usize,
        n_constituents: u64,
        params: Vec<PartyParameters>,
    ) -> Result<Self> {
        Self::new(
            n_parties,
            n_constituents,
            ElectionModel::PerPartyGaussian { params },
        )
    }

    pub fn with_residual_correction(mut self, correction: ResidualCorrection) -> Self {
        self.residual_correction = correction;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_parties < 2 {
            return Err(ElectionError::invalid_parameters(format!(
                "n_parties must be at least 2, got {}",
                self.n_parties
            )));
        }

        match &self.model {
            ElectionModel::Uniform => Ok(()),
            ElectionModel::SingleGaussian { mean, stdev } => {
                PartyParameters::new(*mean, *stdev).map(|_| ())
            }
            ElectionModel::PerPartyGaussian { params } => {
                if params.len() != self.n_parties {
                    return Err(ElectionError::invalid_parameters(format!(
                        "{} party parameters given for {} parties",
                        params.len(),
                        self.n_parties
                    )));
                }
                params.iter().try_for_each(PartyParameters::validate)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_too_few_parties() {
        assert!(Election::uniform(1, 100).is_err());
        assert!(Election::uniform(2, 100).is_ok());
    }

    #[test]
    fn test_rejects_negative_stdev() {
        let err = Election::gaussian(3, 100, 30.0, -1.0).unwrap_err();
        assert!(matches!(err, ElectionError::InvalidParameters(_)));
    }

    #[test]
    fn test_rejects_parameter_count_mismatch() {
        let params = vec![PartyParameters::from((50.0, 5.0)); 2];
        assert!(Election::party_specific(3, 100, params).is_err());
    }

    #[test]
    fn test_model_serializes_with_kind_tag() {
        let model = ElectionModel::SingleGaussian {
            mean: 30.0,
            stdev: 5.0,
        };
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#"{"kind":"single_gaussian","mean":30.0,"stdev":5.0}"#);

        let back: ElectionModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);
    }

    #[test]
    fn test_labels() {
        assert_eq!(ElectionModel::Uniform.label(), "uniform");
        assert_eq!(
            ElectionModel::PerPartyGaussian { params: vec![] }.label(),
            "per-party gaussian"
        );
    }
}
