// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Queue Arena - Simulation Core
//
// Single server, FIFO, work-conserving, optional finite buffer. The engine
// folds the sorted arrival/observer timeline into run counters, deriving one
// departure per admitted arrival as it goes.

use std::collections::VecDeque;

use rand::Rng;
use tracing::{debug, trace};

use crate::config::{ConfigError, SimConfig};
use crate::stats::{RunCounters, StatsError};
use crate::timeline::EventTimeline;
use crate::types::*;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Degenerate(#[from] StatsError),
}

// ─── Service recursion ───────────────────────────────────────────────────────

/// Departure time of a packet arriving at `arrival_time`.
///
/// An idle server (no earlier departure, or the last one already happened)
/// starts service on arrival; a busy one starts it when the previous packet
/// leaves.
pub fn departure_time(arrival_time: f64, service_time: f64, prev_departure: Option<f64>) -> f64 {
    match prev_departure {
        Some(prev) if arrival_time <= prev => prev + service_time,
        _ => arrival_time + service_time,
    }
}

// ─── RunOutcome ──────────────────────────────────────────────────────────────

/// Everything one pass over a timeline produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub counters: RunCounters,
    /// Derived departures in the order they were processed.
    pub departures: Vec<Event>,
    pub peak_occupancy: u64,
}

impl RunOutcome {
    pub fn summarize(&self) -> Result<SimSummary, StatsError> {
        self.counters.summarize()
    }
}

// ─── QueueSimulation ─────────────────────────────────────────────────────────

/// A validated configuration; every run starts from fresh state.
#[derive(Debug, Clone)]
pub struct QueueSimulation {
    config: SimConfig,
}

impl QueueSimulation {
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn generate_timeline<R: Rng + ?Sized>(&self, rng: &mut R) -> EventTimeline {
        EventTimeline::generate(&self.config, rng)
    }

    /// Walk a sorted timeline of arrivals and observers.
    ///
    /// Departures already present on `timeline` are ignored; the engine
    /// derives its own from the arrivals it admits.
    pub fn process(&self, timeline: &EventTimeline) -> RunOutcome {
        RunState::new(&self.config).walk(timeline)
    }

    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SimSummary, SimError> {
        let timeline = self.generate_timeline(rng);
        let outcome = self.process(&timeline);
        Ok(outcome.summarize()?)
    }

    /// Like `run`, also returning the full timeline with departures merged in.
    pub fn run_with_timeline<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(SimSummary, EventTimeline), SimError> {
        let mut timeline = self.generate_timeline(rng);
        let outcome = self.process(&timeline);
        let summary = outcome.summarize()?;
        timeline.extend_sorted(outcome.departures);
        Ok((summary, timeline))
    }
}

// ─── Run state ───────────────────────────────────────────────────────────────

struct RunState {
    capacity: Capacity,
    link_rate_bps: f64,

    occupancy: u64,
    peak_occupancy: u64,
    counters: RunCounters,

    /// When the server next becomes free.
    prev_departure: Option<f64>,
    /// Scheduled but not yet reached. FIFO service keeps this sorted.
    pending: VecDeque<Event>,
    departed: Vec<Event>,
}

impl RunState {
    fn new(config: &SimConfig) -> Self {
        Self {
            capacity: config.capacity,
            link_rate_bps: config.link_rate_bps,
            occupancy: 0,
            peak_occupancy: 0,
            counters: RunCounters::default(),
            prev_departure: None,
            pending: VecDeque::new(),
            departed: Vec::new(),
        }
    }

    fn walk(mut self, timeline: &EventTimeline) -> RunOutcome {
        debug!(events = timeline.len(), capacity = %self.capacity, "run started");

        for event in timeline {
            // A departure tied with the next event is handled after it.
            self.release_before(event.time());
            match *event {
                Event::Arrival { id, time, length } => self.arrive(id, time, length),
                Event::Observation { .. } => self.counters.observe(),
                Event::Departure { id, .. } => trace!(id, "ignoring pre-placed departure"),
            }
            debug_assert_eq!(self.occupancy, self.counters.in_system());
        }
        // Packets still in service at the horizon leave after it.
        self.release_before(f64::INFINITY);

        debug!(
            accepted = self.counters.accepted,
            dropped = self.counters.dropped,
            departures = self.counters.departures,
            observations = self.counters.observations,
            peak_occupancy = self.peak_occupancy,
            "run finished"
        );

        RunOutcome {
            counters: self.counters,
            departures: self.departed,
            peak_occupancy: self.peak_occupancy,
        }
    }

    fn arrive(&mut self, id: u64, time: f64, length: f64) {
        if !self.capacity.admits(self.occupancy) {
            self.counters.dropped += 1;
            trace!(id, time, occupancy = self.occupancy, "packet dropped");
            return;
        }

        self.occupancy += 1;
        self.peak_occupancy = self.peak_occupancy.max(self.occupancy);
        self.counters.accepted += 1;

        let service_time = length / self.link_rate_bps;
        let leave_at = departure_time(time, service_time, self.prev_departure);
        self.prev_departure = Some(leave_at);
        self.pending.push_back(Event::departure(id, leave_at, length));
    }

    fn release_before(&mut self, time: f64) {
        while let Some(next) = self.pending.front() {
            if next.time() >= time {
                break;
            }
            if let Some(departure) = self.pending.pop_front() {
                self.occupancy -= 1;
                self.counters.departures += 1;
                self.departed.push(departure);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(capacity: Capacity) -> SimConfig {
        SimConfig {
            arrival_rate: 500.0,
            mean_packet_length_bits: 2000.0,
            horizon: 1.0,
            observer_rate: 2500.0,
            link_rate_bps: 1_000_000.0,
            capacity,
        }
    }

    fn engine(capacity: Capacity) -> QueueSimulation {
        QueueSimulation::new(config(capacity)).unwrap()
    }

    #[test]
    fn departure_time_idle_and_busy() {
        assert_eq!(departure_time(1.0, 0.5, None), 1.5);
        assert_eq!(departure_time(1.0, 0.5, Some(0.9)), 1.5);
        assert_eq!(departure_time(1.0, 0.5, Some(1.0)), 1.5);
        assert_eq!(departure_time(1.0, 0.5, Some(1.2)), 1.7);
    }

    #[test]
    fn busy_server_queues_second_packet() {
        let timeline = EventTimeline::from_events(vec![
            Event::arrival(1, 0.0, 2000.0),
            Event::arrival(2, 0.001, 2000.0),
        ]);
        let outcome = engine(Capacity::Finite(2)).process(&timeline);
        let times: Vec<f64> = outcome.departures.iter().map(Event::time).collect();
        assert_eq!(outcome.counters.accepted, 2);
        assert!((times[0] - 0.002).abs() < 1e-12);
        assert!((times[1] - 0.004).abs() < 1e-12);
        assert_eq!(outcome.departures[1].id(), 2);
    }

    #[test]
    fn idle_server_starts_on_arrival() {
        let timeline = EventTimeline::from_events(vec![
            Event::arrival(1, 0.0, 2000.0),
            Event::arrival(2, 0.01, 2000.0),
        ]);
        let outcome = engine(Capacity::Unbounded).process(&timeline);
        assert!((outcome.departures[1].time() - 0.012).abs() < 1e-12);
        assert_eq!(outcome.peak_occupancy, 1);
    }

    #[test]
    fn full_buffer_drops_arrival() {
        let timeline = EventTimeline::from_events(vec![
            Event::arrival(1, 0.0, 2000.0),
            Event::arrival(2, 0.0005, 2000.0),
        ]);
        let outcome = engine(Capacity::Finite(1)).process(&timeline);
        assert_eq!(outcome.counters.accepted, 1);
        assert_eq!(outcome.counters.dropped, 1);
        assert_eq!(outcome.peak_occupancy, 1);
        assert_eq!(outcome.departures.len(), 1);
    }

    #[test]
    fn departure_tied_with_arrival_is_processed_after_it() {
        let timeline = EventTimeline::from_events(vec![
            Event::arrival(1, 0.0, 2000.0),
            Event::arrival(2, 0.002, 2000.0),
        ]);
        let outcome = engine(Capacity::Finite(1)).process(&timeline);
        assert_eq!(outcome.counters.dropped, 1);
    }

    #[test]
    fn observers_sample_occupancy() {
        let timeline = EventTimeline::from_events(vec![
            Event::observation(1, 0.0005),
            Event::arrival(1, 0.001, 2000.0),
            Event::arrival(2, 0.0015, 2000.0),
            Event::observation(2, 0.002),
            Event::observation(3, 0.0045),
            Event::observation(4, 0.006),
        ]);
        let outcome = engine(Capacity::Unbounded).process(&timeline);
        // Samples: 0, 2, 1, 0
        assert_eq!(outcome.counters.observations, 4);
        assert_eq!(outcome.counters.occupancy_sum, 3);
        assert_eq!(outcome.counters.idle_samples, 2);

        let summary = outcome.summarize().unwrap();
        assert!((summary.mean_occupancy - 0.75).abs() < 1e-12);
        assert!((summary.idle_probability - 0.5).abs() < 1e-12);
    }

    #[test]
    fn pre_placed_departures_are_ignored() {
        let timeline = EventTimeline::from_events(vec![
            Event::arrival(1, 0.0, 2000.0),
            Event::departure(1, 0.002, 2000.0),
            Event::observation(1, 0.003),
        ]);
        let outcome = engine(Capacity::Unbounded).process(&timeline);
        assert_eq!(outcome.counters.departures, 1);
        assert_eq!(outcome.counters.idle_samples, 1);
    }

    #[test]
    fn packets_in_service_at_horizon_still_depart() {
        let timeline = EventTimeline::from_events(vec![
            Event::arrival(1, 0.999, 2000.0),
            Event::arrival(2, 0.9995, 2000.0),
        ]);
        let outcome = engine(Capacity::Unbounded).process(&timeline);
        assert_eq!(outcome.counters.departures, 2);
        assert!(outcome.departures[1].time() > 1.0);
    }

    #[test]
    fn new_rejects_invalid_config() {
        let mut c = config(Capacity::Unbounded);
        c.mean_packet_length_bits = 0.0;
        assert!(matches!(
            QueueSimulation::new(c),
            Err(ConfigError::InvalidParameter { name: "mean_packet_length_bits", .. })
        ));
    }

    #[test]
    fn empty_timeline_is_degenerate() {
        let outcome = engine(Capacity::Unbounded).process(&EventTimeline::new());
        assert_eq!(outcome.summarize(), Err(StatsError::NoObservations));
    }
}
