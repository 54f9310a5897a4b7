//! Converts percentage shares into absolute voter counts.

use std::collections::BTreeMap;

/// Key for party `k` in a vote distribution.
pub fn party_key(party: usize) -> String {
    format!("party_{party}")
}

/// `party_<k>` -> `n_constituents * share_k / 100`.
pub fn vote_distribution(percent_arr: &[f64], n_constituents: u64) -> BTreeMap<String, f64> {
    percent_arr
        .iter()
        .enumerate()
        .map(|(party, share)| (party_key(party), n_constituents as f64 * share / 100.0))
        .collect()
}
