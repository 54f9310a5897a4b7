//! Stochastic percentage-budget allocation.
//!
//! Draws ([`sampling`]) feed passes ([`pass`]) that claim shares of a
//! constituency's budget ([`budget`]); the [`allocator`] repeats passes until
//! the budget converges and averages several repetitions ([`reducer`]).

pub mod allocator;
pub mod budget;
pub mod pass;
pub mod reducer;
pub mod sampling;

pub use allocator::{correct_residual, PartyAllocator, ResidualCorrection};
pub use budget::PercentageBudget;
pub use pass::{AllocationPass, AllocationState};
pub use reducer::repeat_and_average;
pub use sampling::{EscalationPolicy, GaussianSampler, Ladder, PartyParameters};
