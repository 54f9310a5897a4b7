//! Dropped Votes - First-Past-The-Post Wasted-Vote Simulator
//!
//! Estimates what fraction of cast votes go to losing parties by allocating
//! each constituency's vote share stochastically and averaging over many
//! constituencies and iterations.

pub mod allocation;
pub mod build_info;
pub mod constants;
pub mod election;
pub mod error;
pub mod simulator;

pub use error::{ElectionError, Result};
