//! The shrinking pool of unallocated vote share for one constituency.
//!
//! Shares live on a 0.0001 grid, so the budget is kept as whole units
//! (1,000,000 units = 100.0000 points) and never drifts under repeated
//! subtraction.

use crate::constants::{BUDGET_UNITS, GRID_TOLERANCE, SHARE_DECIMALS, UNITS_PER_POINT};
use crate::error::{ElectionError, Result};

/// Remaining vote share, in budget units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PercentageBudget {
    remaining_units: u32,
}

impl Default for PercentageBudget {
    fn default() -> Self {
        Self::new()
    }
}

impl PercentageBudget {
    /// A full budget of 100.0000 points.
    pub fn new() -> Self {
        Self {
            remaining_units: BUDGET_UNITS,
        }
    }

    /// A budget starting at `points` (must be on the grid and at most 100).
    pub fn with_remaining(points: f64) -> Result<Self> {
        match to_units(points) {
            Some(units) if units <= BUDGET_UNITS => Ok(Self {
                remaining_units: units,
            }),
            _ => Err(ElectionError::invalid_parameters(format!(
                "budget of {points} is not a 0.0001-resolution value in [0, 100]"
            ))),
        }
    }

    pub fn remaining(&self) -> f64 {
        units_to_points(self.remaining_units)
    }

    pub fn remaining_units(&self) -> u32 {
        self.remaining_units
    }

    /// True iff `share` is on the grid and `0 <= share <= remaining`.
    pub fn feasible(&self, share: f64) -> bool {
        to_units(share).is_some_and(|units| units <= self.remaining_units)
    }

    pub fn consume(&mut self, share: f64) -> Result<()> {
        match to_units(share) {
            Some(units) if units <= self.remaining_units => {
                self.remaining_units -= units;
                Ok(())
            }
            _ => Err(ElectionError::InvalidAllocation {
                requested: share,
                remaining: self.remaining(),
            }),
        }
    }

    /// Empty the budget, returning what was left.
    pub fn drain(&mut self) -> f64 {
        let left = self.remaining();
        self.remaining_units = 0;
        left
    }
}

/// Converts a share in points to budget units, or `None` when it is
/// negative, non-finite, or off the 0.0001 grid.
pub fn to_units(points: f64) -> Option<u32> {
    if !points.is_finite() || points < 0.0 {
        return None;
    }
    let scaled = points * UNITS_PER_POINT as f64;
    let units = scaled.round();
    if (scaled - units).abs() > GRID_TOLERANCE || units > u32::MAX as f64 {
        return None;
    }
    Some(units as u32)
}

pub fn units_to_points(units: u32) -> f64 {
    units as f64 / UNITS_PER_POINT as f64
}

/// Rounds a raw sample to 4 decimal places.
pub fn round_to_grid(value: f64) -> f64 {
    let factor = 10f64.powi(SHARE_DECIMALS);
    (value * factor).round() / factor
}
