//! Dropped-vote simulator CLI.
//!
//! Run Monte Carlo simulations of first-past-the-post constituencies.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                               # Uniform model, 3 parties
//!   cargo run --bin simulate -- --mean 30 --stdev 5 -p 4   # Shared Gaussian
//!   cargo run --bin simulate -- --reference -i 20          # Six-party reference
//!   cargo run --bin simulate -- --party 45:5 --party 40:5 --party 15:3 --seed 42

use dropped_votes::allocation::{PartyParameters, ResidualCorrection};
use dropped_votes::build_info::version_line;
use dropped_votes::election::ElectionModel;
use dropped_votes::simulator::{run_simulation, SimConfig};
use std::env;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = env::args().collect();
    let config = match parse_args(&args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {}", message);
            eprintln!("Run with --help for usage.");
            std::process::exit(2);
        }
    };

    // Diagnostics go to stderr so the report on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(log_level(config.verbosity).into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if config.verbosity >= 1 {
        print_banner(&config);
    }

    let report = match run_simulation(&config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", report.to_text());

    // Optionally save JSON report
    if args.iter().any(|a| a == "--json") {
        let json = report.to_json();
        let filename = format!(
            "dropped_votes_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, json) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(e) => {
                eprintln!("Failed to write JSON report {}: {}", filename, e);
                std::process::exit(1);
            }
        }
    }
}

/// `-q` keeps warnings, the default adds info, `-v` adds the allocator's debug events.
fn log_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

fn print_banner(config: &SimConfig) {
    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              DROPPED VOTE SIMULATOR                           ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Model:          {}", config.model.label());
    println!("  Parties:        {}", config.n_parties);
    println!("  Constituencies: {:?}", config.constituency_sizes);
    println!("  Iterations:     {}", config.iterations);
    match &config.model {
        ElectionModel::SingleGaussian { mean, stdev } => {
            println!("  Mean / Stdev:   {} / {}", mean, stdev);
        }
        ElectionModel::PerPartyGaussian { params } => {
            for (party, p) in params.iter().enumerate() {
                println!("  party_{:<9} mean {:>6.2}, stdev {:>5.2}", party, p.mean, p.stdev);
            }
            if config.residual_correction == ResidualCorrection::LegacyThirds {
                println!("  Correction:     legacy diff/3");
            }
        }
        ElectionModel::Uniform => {}
    }
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();
}

fn parse_args(args: &[String]) -> Result<SimConfig, String> {
    let mut config = SimConfig::default();
    let mut parties_flag: Option<usize> = None;
    let mut mean: Option<f64> = None;
    let mut stdev: Option<f64> = None;
    let mut party_params: Vec<PartyParameters> = Vec::new();
    let mut reference = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-p" | "--parties" => {
                parties_flag = Some(parse_value(args, &mut i)?);
            }
            "-c" | "--constituencies" => {
                let raw: String = parse_value(args, &mut i)?;
                config.constituency_sizes = raw
                    .split(',')
                    .map(|s| s.trim().parse::<u64>())
                    .collect::<Result<_, _>>()
                    .map_err(|e| format!("invalid constituency size in '{}': {}", raw, e))?;
            }
            "-i" | "--iterations" => {
                config.iterations = parse_value(args, &mut i)?;
            }
            "-s" | "--seed" => {
                config.seed = Some(parse_value(args, &mut i)?);
            }
            "--mean" => {
                mean = Some(parse_value(args, &mut i)?);
            }
            "--stdev" => {
                stdev = Some(parse_value(args, &mut i)?);
            }
            "--party" => {
                let raw: String = parse_value(args, &mut i)?;
                party_params.push(parse_party(&raw)?);
            }
            "--reference" => {
                reference = true;
            }
            "--legacy-thirds" => {
                config.residual_correction = ResidualCorrection::LegacyThirds;
            }
            "--json" => {}
            "-v" | "--verbose" => {
                config.verbosity = 2;
            }
            "-q" | "--quiet" => {
                config.verbosity = 0;
            }
            "--version" => {
                println!("{}", version_line());
                std::process::exit(0);
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => return Err(format!("unknown option '{}'", other)),
        }
        i += 1;
    }

    if reference {
        let preset = SimConfig::reference_six_party(config.iterations);
        config.n_parties = preset.n_parties;
        config.model = preset.model;
    } else if !party_params.is_empty() {
        config.n_parties = parties_flag.unwrap_or(party_params.len());
        config.model = ElectionModel::PerPartyGaussian {
            params: party_params,
        };
    } else if mean.is_some() || stdev.is_some() {
        let (Some(mean), Some(stdev)) = (mean, stdev) else {
            return Err("--mean and --stdev must be given together".to_string());
        };
        config.n_parties = parties_flag.unwrap_or(config.n_parties);
        config.model = ElectionModel::SingleGaussian { mean, stdev };
    } else {
        config.n_parties = parties_flag.unwrap_or(config.n_parties);
    }

    Ok(config)
}

/// Parses the value following the flag at `args[*i]` and advances past it.
fn parse_value<T>(args: &[String], i: &mut usize) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let flag = &args[*i];
    let raw = args
        .get(*i + 1)
        .ok_or_else(|| format!("{} needs a value", flag))?;
    *i += 1;
    raw.parse()
        .map_err(|e| format!("invalid value '{}' for {}: {}", raw, flag, e))
}

/// `mean:stdev`
fn parse_party(raw: &str) -> Result<PartyParameters, String> {
    let (mean, stdev) = raw
        .split_once(':')
        .ok_or_else(|| format!("party parameters must look like mean:stdev, got '{}'", raw))?;
    let mean: f64 = mean
        .trim()
        .parse()
        .map_err(|e| format!("invalid mean in '{}': {}", raw, e))?;
    let stdev: f64 = stdev
        .trim()
        .parse()
        .map_err(|e| format!("invalid stdev in '{}': {}", raw, e))?;
    PartyParameters::new(mean, stdev).map_err(|e| e.to_string())
}

fn print_help() {
    println!("Dropped Vote Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -p, --parties <N>         Parties per constituency (default: 3)");
    println!("    -c, --constituencies <L>  Comma-separated constituency sizes");
    println!("                              (default: 50000,75000,100000)");
    println!("    -i, --iterations <N>      Iterations over all constituencies (default: 100)");
    println!("    -s, --seed <S>            Random seed for reproducibility");
    println!("    --mean <M> --stdev <S>    Shared Gaussian for every party");
    println!("    --party <M:S>             Per-party Gaussian (repeat once per party)");
    println!("    --reference               Six-party reference distribution");
    println!("    --legacy-thirds           Spread the per-party shortfall as diff/3");
    println!("    --json                    Save JSON report to file");
    println!("    -v, --verbose             Print every run");
    println!("    -q, --quiet               Only print the report");
    println!("    --version                 Print version information");
    println!("    -h, --help                Print this help message");
    println!();
    println!("Without --mean/--stdev or --party, shares are drawn uniformly.");
}
