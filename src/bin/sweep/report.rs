// Sweep Report Types
// Structured output for the CSV/JSON exports and the console table

use queue_arena::variate::SampleMoments;
use queue_arena::{Capacity, SimSummary};
use serde::Serialize;

// ─── Statistics (across replications of one point) ──────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub n: usize,
}

impl Stats {
    pub fn from_samples(samples: &[f64]) -> Self {
        let n = samples.len();
        if n == 0 {
            return Self { mean: 0.0, std_dev: 0.0, min: 0.0, max: 0.0, n: 0 };
        }
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = if n > 1 {
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };
        Self {
            mean,
            std_dev: variance.sqrt(),
            min: samples.iter().cloned().fold(f64::INFINITY, f64::min),
            max: samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            n,
        }
    }
}

// ─── Single-Run Result ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub seed: u64,
    pub summary: SimSummary,
}

// ─── Point Report (one (rho, K) pair) ───────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct PointReport {
    pub rho: f64,
    pub capacity: Capacity,
    pub arrival_rate: f64,
    pub observer_rate: f64,
    pub runs: usize,
    pub degenerate_runs: usize,
    pub arrivals: Stats,
    pub departures: Stats,
    pub observations: Stats,
    pub mean_occupancy: Stats,
    pub idle_probability: Stats,
    pub loss_probability: Stats,
    pub elapsed_ms: u128,
    pub individual_runs: Vec<RunResult>,
}

impl PointReport {
    pub fn has_results(&self) -> bool {
        !self.individual_runs.is_empty()
    }
}

// ─── Scenario Report ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub label: String,
    pub capacity: Capacity,
    pub points: Vec<PointReport>,
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SweepReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub horizon: f64,
    pub runs_per_point: usize,
    pub base_seed: u64,
    pub variate_check: Option<SampleMoments>,
    pub scenarios: Vec<ScenarioReport>,
}
