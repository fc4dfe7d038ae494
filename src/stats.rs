// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Queue Arena - Run Statistics
//
// Observers arrive as a Poisson process independent of the queue, so the
// occupancy they see is distributed as the time-average occupancy (PASTA).
// Averaging their samples estimates E[N] and P(idle) without integrating
// occupancy over time.

use serde::{Deserialize, Serialize};

use crate::types::SimSummary;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A run that produced nothing to estimate from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    #[error("degenerate run: no observer samples within the horizon")]
    NoObservations,
    #[error("degenerate run: no arrivals within the horizon")]
    NoArrivals,
}

// ---------------------------------------------------------------------------
// RunCounters
// ---------------------------------------------------------------------------

/// Running totals accumulated while the engine walks the timeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounters {
    pub accepted: u64,
    pub dropped: u64,
    pub departures: u64,
    pub observations: u64,
    /// Sum of occupancy seen at each observer instant.
    pub occupancy_sum: u64,
    /// Observer instants that found the system empty.
    pub idle_samples: u64,
}

impl RunCounters {
    pub fn arrivals(&self) -> u64 {
        self.accepted + self.dropped
    }

    /// Occupancy implied by admissions minus departures.
    pub fn in_system(&self) -> u64 {
        self.accepted - self.departures
    }

    /// Record one observer sample of the current occupancy.
    pub fn observe(&mut self) {
        let n = self.in_system();
        self.observations += 1;
        self.occupancy_sum += n;
        if n == 0 {
            self.idle_samples += 1;
        }
    }

    /// Turn the final counters into the run summary.
    ///
    /// Loss is measured against every generated arrival, admitted or dropped.
    pub fn summarize(&self) -> Result<SimSummary, StatsError> {
        if self.observations == 0 {
            return Err(StatsError::NoObservations);
        }
        let arrivals = self.arrivals();
        if arrivals == 0 {
            return Err(StatsError::NoArrivals);
        }

        let observations = self.observations as f64;
        Ok(SimSummary {
            arrivals,
            accepted: self.accepted,
            dropped: self.dropped,
            observations: self.observations,
            departures: self.departures,
            mean_occupancy: self.occupancy_sum as f64 / observations,
            idle_probability: self.idle_samples as f64 / observations,
            loss_probability: self.dropped as f64 / arrivals as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loss_uses_all_generated_arrivals() {
        let counters = RunCounters {
            accepted: 80,
            dropped: 20,
            departures: 80,
            observations: 10,
            occupancy_sum: 25,
            idle_samples: 4,
        };
        let s = counters.summarize().unwrap();
        assert_eq!(s.arrivals, 100);
        assert!((s.loss_probability - 0.20).abs() < 1e-12);
        assert!((s.mean_occupancy - 2.5).abs() < 1e-12);
        assert!((s.idle_probability - 0.4).abs() < 1e-12);
    }

    #[test]
    fn no_observations_is_degenerate() {
        let counters = RunCounters { accepted: 5, departures: 5, ..Default::default() };
        assert_eq!(counters.summarize(), Err(StatsError::NoObservations));
    }

    #[test]
    fn no_arrivals_is_degenerate() {
        let mut counters = RunCounters::default();
        counters.observe();
        assert_eq!(counters.summarize(), Err(StatsError::NoArrivals));
    }

    #[test]
    fn observe_samples_admitted_minus_departed() {
        let mut c = RunCounters { accepted: 3, dropped: 7, departures: 1, ..Default::default() };
        c.observe();
        c.departures = 3;
        c.observe();
        assert_eq!(c.observations, 2);
        assert_eq!(c.occupancy_sum, 2);
        assert_eq!(c.idle_samples, 1);
    }

    #[test]
    fn no_drops_means_zero_loss() {
        let c = RunCounters { accepted: 12, departures: 12, observations: 3, ..Default::default() };
        assert_eq!(c.summarize().unwrap().loss_probability, 0.0);
    }
}
