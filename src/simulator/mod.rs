//! Dropped-vote simulator for Monte Carlo analysis.
//!
//! Simulates many first-past-the-post constituencies, repeated over several
//! iterations, to estimate:
//! - The average share of votes cast for losing parties
//! - Average party shares under the chosen vote model
//! - Voter counts per party across the simulated constituencies
//!
//! Each constituency is a single call into the election runner, so simulated
//! results match what a direct call would produce.

mod config;
mod report;
mod runner;

pub use config::{SimConfig, REFERENCE_SIX_PARTY};
pub use report::SimReport;
pub use runner::{run_rng, run_simulation};
