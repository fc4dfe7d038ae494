// Queue Sweep Runner - offered-load sweeps over M/M/1 and M/M/1/K
// Seedable ChaCha8 PRNG, N replications per point, CSV + JSON output
//
// Usage:
//   cargo run --release --bin sweep                         # All scenarios, 1 run per point
//   cargo run --release --bin sweep -- --runs 5             # 5 replications per point
//   cargo run --release --bin sweep -- MM1K                 # Filter by name
//   cargo run --release --bin sweep -- --horizon 100        # Shorter simulated time
//   cargo run --release --bin sweep -- --events events.csv  # Dump one raw timeline
//   cargo run --release --bin sweep -- --check-variate      # Exponential moments check
//   cargo run --release --bin sweep -- --config point.json  # One JSON-described point
//   RUST_LOG=debug cargo run --release --bin sweep          # Per-run engine logs

mod export;
mod monte_carlo;
mod report;
mod scenarios;

use queue_arena::variate::sample_moments;
use queue_arena::{QueueSimulation, SimConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use report::*;
use scenarios::*;
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VARIATE_CHECK_RATE: f64 = 75.0;
const VARIATE_CHECK_SAMPLES: usize = 1000;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    horizon: f64,
    out_dir: PathBuf,
    events: Option<PathBuf>,
    config: Option<PathBuf>,
    check_variate: bool,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        runs: 1,
        seed: 0,
        horizon: DEFAULT_HORIZON,
        out_dir: PathBuf::from("sweep-results"),
        events: None,
        config: None,
        check_variate: false,
        filter: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if i < args.len() {
                    cli.runs = args[i].parse().unwrap_or(1).max(1);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--horizon" => {
                i += 1;
                if i < args.len() {
                    cli.horizon = args[i].parse().unwrap_or(DEFAULT_HORIZON);
                }
            }
            "--out" => {
                i += 1;
                if i < args.len() {
                    cli.out_dir = PathBuf::from(&args[i]);
                }
            }
            "--events" => {
                i += 1;
                if i < args.len() {
                    cli.events = Some(PathBuf::from(&args[i]));
                }
            }
            "--config" => {
                i += 1;
                if i < args.len() {
                    cli.config = Some(PathBuf::from(&args[i]));
                }
            }
            "--check-variate" => {
                cli.check_variate = true;
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
            }
        }
        i += 1;
    }

    cli
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    init_logging();
    let cli = parse_args();

    if let Some(path) = &cli.config {
        run_single_config(&cli, path);
        return;
    }

    let all_scenarios = scenarios();
    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => all_scenarios.iter().filter(|s| s.matches(f)).collect(),
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        eprintln!("No scenarios match filter: {:?}", cli.filter);
        std::process::exit(1);
    }

    println!("\n  Queue Sweep Runner v0.2.0");
    println!("  PRNG: ChaCha8Rng | Runs/point: {} | Base seed: {} | T = {}s",
        cli.runs, cli.seed, cli.horizon);

    let variate_check = if cli.check_variate {
        let mut rng = ChaCha8Rng::seed_from_u64(cli.seed);
        let m = sample_moments(&mut rng, VARIATE_CHECK_RATE, VARIATE_CHECK_SAMPLES);
        println!("  Variate check (rate {}, n={}): mean {:.6} (expected {:.6}), variance {:.3e} (expected {:.3e})",
            m.rate, m.samples, m.mean, m.expected_mean, m.variance, m.expected_variance);
        Some(m)
    } else {
        None
    };

    println!("  Running {} scenario(s)...\n", to_run.len());
    println!("  {:<18} {:>4} {:>5} {:>10} {:>8} {:>8} {:>10} {:>7}",
        "Scenario", "K", "rho", "E[N]", "P_idle", "P_loss", "Arrivals", "Time");
    println!("  {}", "-".repeat(78));

    let suite_start = Instant::now();
    let mut scenario_reports = Vec::with_capacity(to_run.len());

    for scenario in &to_run {
        let report = match monte_carlo::run_scenario(scenario, cli.horizon, cli.runs, cli.seed) {
            Ok(r) => r,
            Err(e) => {
                error!(scenario = scenario.name, "invalid sweep point: {}", e);
                std::process::exit(1);
            }
        };

        for p in &report.points {
            if !p.has_results() {
                println!("  {:<18} {:>4} {:>5.2} {:>10}  all {} run(s) degenerate",
                    report.name, report.capacity.to_string(), p.rho, "-", p.runs);
                continue;
            }
            println!("  {:<18} {:>4} {:>5.2} {:>10.4} {:>8.4} {:>8.4} {:>10.0} {:>5}ms",
                report.name,
                report.capacity.to_string(),
                p.rho,
                p.mean_occupancy.mean,
                p.idle_probability.mean,
                p.loss_probability.mean,
                p.arrivals.mean,
                p.elapsed_ms,
            );
        }

        let csv_path = cli.out_dir.join(format!("{}.csv", report.name.to_lowercase()));
        if let Err(e) = export::write_scenario_csv(&csv_path, &report) {
            eprintln!("  Warning: failed to write {}: {}", csv_path.display(), e);
        }

        scenario_reports.push(report);
    }

    let suite_elapsed = suite_start.elapsed();
    println!("  {}", "-".repeat(78));
    println!("  Suite time: {:.1}s\n", suite_elapsed.as_secs_f64());

    if let Some(path) = &cli.events {
        let scenario = to_run[0];
        let config = scenario.config(scenario.loads[0], cli.horizon);
        export_events(&config, cli.seed, path);
    }

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_millis();
    let timestamp = format!("{}", ts);

    let report = SweepReport {
        timestamp: timestamp.clone(),
        version: "0.2.0",
        prng: "ChaCha8Rng",
        horizon: cli.horizon,
        runs_per_point: cli.runs,
        base_seed: cli.seed,
        variate_check,
        scenarios: scenario_reports,
    };

    std::fs::create_dir_all(&cli.out_dir).expect("Failed to create output directory");
    let path = cli.out_dir.join(format!("sweep-{}.json", timestamp));
    let json = serde_json::to_string_pretty(&report).expect("Failed to serialize");
    std::fs::write(&path, &json).expect("Failed to write sweep report");
    println!("  Results saved to: {}\n", path.display());
}

/// Run the point described by a JSON `SimConfig` and print its report.
fn run_single_config(cli: &CliArgs, path: &std::path::Path) {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };
    let config: SimConfig = match serde_json::from_str(&text) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid config {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };

    let report = match monte_carlo::run_point(&config, cli.runs, cli.seed) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Invalid config {}: {}", path.display(), e);
            std::process::exit(1);
        }
    };
    let json = serde_json::to_string_pretty(&report).expect("Failed to serialize");
    println!("{}", json);

    if let Some(events) = &cli.events {
        export_events(&config, cli.seed, events);
    }
}

fn export_events(config: &SimConfig, seed: u64, path: &std::path::Path) {
    let simulation = match QueueSimulation::new(config.clone()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("  Warning: events not exported: {}", e);
            return;
        }
    };
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    match simulation.run_with_timeline(&mut rng) {
        Ok((_, timeline)) => match export::write_events_csv(path, &timeline) {
            Ok(()) => info!(events = timeline.len(), path = %path.display(), "events written"),
            Err(e) => eprintln!("  Warning: failed to write events: {}", e),
        },
        Err(e) => eprintln!("  Warning: events not exported: {}", e),
    }
}
