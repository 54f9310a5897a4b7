//! Simulation aggregation tests.

use dropped_votes::allocation::PartyParameters;
use dropped_votes::election::{run_election, Election, ElectionModel};
use dropped_votes::simulator::{run_rng, run_simulation, SimConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn per_party(list: &[(f64, f64)]) -> ElectionModel {
    ElectionModel::PerPartyGaussian {
        params: list.iter().copied().map(PartyParameters::from).collect(),
    }
}

#[test]
fn test_single_run_matches_direct_call() {
    let model = per_party(&[(45.0, 5.0), (35.0, 5.0), (20.0, 3.0)]);
    let config = SimConfig {
        n_parties: 3,
        constituency_sizes: vec![25_000],
        iterations: 1,
        model: model.clone(),
        seed: Some(42),
        verbosity: 0,
        ..Default::default()
    };
    let report = run_simulation(&config).unwrap();

    let election = Election::new(3, 25_000, model).unwrap();
    let direct = run_election(&election, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();

    assert_eq!(report.num_runs, 1);
    assert_eq!(report.avg_percent_dropped, direct.percent_dropped);
    assert_eq!(report.avg_percent_arr, direct.percent_arr);
    assert_eq!(report.vote_distribution, direct.vote_distribution);
}

#[test]
fn test_run_rng_is_seed_plus_index() {
    use rand::Rng;
    let mut a = run_rng(Some(10), 3);
    let mut b = ChaCha8Rng::seed_from_u64(13);
    assert_eq!(a.gen::<u64>(), b.gen::<u64>());
}

#[test]
fn test_averages_and_distribution_divisors() {
    let config = SimConfig {
        n_parties: 4,
        constituency_sizes: vec![1_000, 3_000],
        iterations: 3,
        model: ElectionModel::Uniform,
        seed: Some(7),
        verbosity: 0,
        ..Default::default()
    };
    let report = run_simulation(&config).unwrap();

    assert_eq!(report.num_runs, 6);
    assert_eq!(report.dropped_per_run.len(), 6);

    // percent_dropped and percent_arr average over constituencies x iterations
    let mean_dropped = report.dropped_per_run.iter().sum::<f64>() / 6.0;
    assert!((report.avg_percent_dropped - mean_dropped).abs() < 1e-9);
    assert!((report.avg_percent_arr.iter().sum::<f64>() - 100.0).abs() < 1e-9);

    // The distribution averages over iterations only, so it totals every
    // constituency's voters
    let voters: f64 = report.vote_distribution.values().sum();
    assert!((voters - 4_000.0).abs() < 1e-6, "voters {voters}");
}

#[test]
fn test_seeded_simulation_is_reproducible() {
    let config = SimConfig {
        seed: Some(99),
        verbosity: 0,
        ..SimConfig::quick(
            ElectionModel::SingleGaussian {
                mean: 30.0,
                stdev: 6.0,
            },
            3,
        )
    };
    let a = run_simulation(&config).unwrap();
    let b = run_simulation(&config).unwrap();
    assert_eq!(a.dropped_per_run, b.dropped_per_run);
    assert_eq!(a.avg_percent_arr, b.avg_percent_arr);
}

#[test]
fn test_reference_preset_report() {
    let config = SimConfig {
        constituency_sizes: vec![10_000, 20_000],
        seed: Some(2),
        verbosity: 0,
        ..SimConfig::reference_six_party(2)
    };
    let report = run_simulation(&config).unwrap();

    assert_eq!(report.num_runs, 4);
    assert_eq!(report.avg_percent_arr.len(), 6);
    assert!((report.avg_percent_arr.iter().sum::<f64>() - 100.0).abs() < 1e-6);
    assert!(report.avg_percent_dropped > 50.0 && report.avg_percent_dropped < 75.0);

    let text = report.to_text();
    assert!(text.contains("per-party gaussian"));
    let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
    assert_eq!(json["num_runs"], 4);
}

#[test]
fn test_failing_run_aborts_simulation() {
    let config = SimConfig {
        n_parties: 3,
        model: per_party(&[(50.0, 5.0), (50.0, 5.0)]),
        seed: Some(1),
        verbosity: 0,
        ..SimConfig::quick(ElectionModel::Uniform, 3)
    };
    assert!(run_simulation(&config).is_err());
}
