//! Single-constituency first-past-the-post elections.

pub mod distribution;
pub mod model;
pub mod runner;

pub use distribution::{party_key, vote_distribution};
pub use model::{Election, ElectionModel};
pub use runner::{
    percent_dropped, run_election, run_gaussian, run_party_specific, run_uniform,
    ElectionOutcome, RunResult,
};
