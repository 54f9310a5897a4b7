// Vote-share budget
pub const TOTAL_PERCENT: f64 = 100.0;
pub const UNITS_PER_POINT: u32 = 10_000; // 0.0001 resolution
pub const BUDGET_UNITS: u32 = 1_000_000; // 100.0000 points
pub const SHARE_DECIMALS: i32 = 4;

// Off-grid tolerance when converting a share to budget units
pub const GRID_TOLERANCE: f64 = 1e-6;

// Gaussian draws
pub const SAMPLE_POOL_SIZE: usize = 1000;

// Escalation ladder thresholds (attempt counts within one party's retry loop)
pub const INITIAL_SCALE_AFTER: u32 = 20;
pub const INITIAL_DAMP_AFTER: u32 = 50;
pub const RESCALED_DAMP_AFTER: u32 = 30;

// Refill passes stop once the remaining budget is at or below this many units (1.0 point)
pub const RESIDUAL_THRESHOLD_UNITS: u32 = UNITS_PER_POINT;

// Monte Carlo repetitions per constituency
pub const REPETITIONS_PER_CONSTITUENCY: usize = 10;

// Parties in the legacy residual correction divisor
pub const LEGACY_CORRECTION_PARTIES: f64 = 3.0;

// Uniform variant draws whole percentage points
pub const UNIFORM_MIN_DRAW: u32 = 1;
