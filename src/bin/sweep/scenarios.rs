// Sweep Definitions - offered-load sweeps for M/M/1 and M/M/1/K
// Every point is one SimConfig built from (rho, K) with fixed L, C and T

use queue_arena::{Capacity, SimConfig};

// ─── Fixed link parameters ──────────────────────────────────────────────────

/// Mean packet length L (bits).
pub const PACKET_LENGTH_BITS: f64 = 2000.0;
/// Link rate C (bits/s).
pub const LINK_RATE_BPS: f64 = 1_000_000.0;
/// Default simulated time T (s).
pub const DEFAULT_HORIZON: f64 = 1000.0;

const STABLE_LOADS: [f64; 8] = [0.25, 0.35, 0.45, 0.55, 0.65, 0.75, 0.85, 0.95];
const OVERLOAD: [f64; 1] = [1.2];
const FINITE_BUFFER_LOADS: [f64; 9] = [0.6, 0.7, 0.8, 0.9, 1.0, 1.1, 1.2, 1.3, 1.4];

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    pub capacity: Capacity,
    pub loads: &'static [f64],
}

impl Scenario {
    pub fn config(&self, rho: f64, horizon: f64) -> SimConfig {
        SimConfig::from_load(rho, PACKET_LENGTH_BITS, LINK_RATE_BPS, horizon, self.capacity)
    }

    pub fn matches(&self, filter: &str) -> bool {
        let f = filter.to_lowercase();
        self.name.to_lowercase().contains(&f) || self.label.to_lowercase().contains(&f)
    }
}

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario { name: "MM1_LOAD_SWEEP", label: "M/M/1 load sweep",
            capacity: Capacity::Unbounded, loads: &STABLE_LOADS },
        Scenario { name: "MM1_OVERLOAD", label: "M/M/1 overload",
            capacity: Capacity::Unbounded, loads: &OVERLOAD },
        Scenario { name: "MM1K_K10", label: "M/M/1/K K=10",
            capacity: Capacity::Finite(10), loads: &FINITE_BUFFER_LOADS },
        Scenario { name: "MM1K_K25", label: "M/M/1/K K=25",
            capacity: Capacity::Finite(25), loads: &FINITE_BUFFER_LOADS },
        Scenario { name: "MM1K_K50", label: "M/M/1/K K=50",
            capacity: Capacity::Finite(50), loads: &FINITE_BUFFER_LOADS },
    ]
}
