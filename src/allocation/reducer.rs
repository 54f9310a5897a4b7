//! Monte Carlo variance reduction: run an allocation several times and
//! average the share vectors elementwise.

use crate::error::{ElectionError, Result};

/// Calls `run` `times` times (with the repetition index) and returns the
/// elementwise mean of the vectors it produced. Every run must produce a
/// vector of the same length.
pub fn repeat_and_average<F>(times: usize, mut run: F) -> Result<Vec<f64>>
where
    F: FnMut(usize) -> Result<Vec<f64>>,
{
    if times == 0 {
        return Err(ElectionError::invalid_parameters(
            "at least one repetition is required",
        ));
    }

    let mut sums = run(0)?;
    for repetition in 1..times {
        let shares = run(repetition)?;
        if shares.len() != sums.len() {
            return Err(ElectionError::invalid_parameters(format!(
                "repetition {repetition} produced {} shares, expected {}",
                shares.len(),
                sums.len()
            )));
        }
        for (sum, share) in sums.iter_mut().zip(&shares) {
            *sum += share;
        }
    }

    let divisor = times as f64;
    Ok(sums.into_iter().map(|sum| sum / divisor).collect())
}
