// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Queue Arena - Event Timeline
//
// Arrivals and observers are two independent renewal processes with
// exponential gaps, each cut off at the horizon. The timeline holds their
// union in timestamp order; departures join it once the engine derives them.

use rand::Rng;

use crate::config::SimConfig;
use crate::types::{Event, EventRow};
use crate::variate::exponential;

// ─── EventTimeline ───────────────────────────────────────────────────────────

/// Events in non-decreasing timestamp order.
///
/// Equal timestamps keep insertion order, so the outcome of a run never
/// depends on how the sort breaks ties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventTimeline {
    events: Vec<Event>,
}

impl EventTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a timeline from events in any order.
    pub fn from_events(events: Vec<Event>) -> Self {
        let mut timeline = Self { events };
        timeline.sort();
        timeline
    }

    /// Generate the arrival and observer processes for one run.
    ///
    /// Arrivals are drawn first, then observers, from the same source.
    pub fn generate<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> Self {
        let mut events = generate_arrivals(
            rng,
            config.arrival_rate,
            config.mean_packet_length_bits,
            config.horizon,
        );
        events.extend(generate_observations(rng, config.observer_rate, config.horizon));
        Self::from_events(events)
    }

    pub fn sort(&mut self) {
        self.events.sort_by(|a, b| a.time().total_cmp(&b.time()));
    }

    /// Insert one event after every event with the same or an earlier timestamp.
    pub fn insert(&mut self, event: Event) {
        let at = self.events.partition_point(|e| e.time() <= event.time());
        self.events.insert(at, event);
    }

    /// Append a batch and restore timestamp order.
    ///
    /// Appended events land after existing events with the same timestamp.
    pub fn extend_sorted<I: IntoIterator<Item = Event>>(&mut self, events: I) {
        self.events.extend(events);
        self.sort();
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn is_sorted(&self) -> bool {
        self.events.windows(2).all(|w| w[0].time() <= w[1].time())
    }

    pub fn rows(&self) -> Vec<EventRow> {
        self.events.iter().map(EventRow::from).collect()
    }
}

impl<'a> IntoIterator for &'a EventTimeline {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

// ─── Renewal processes ──────────────────────────────────────────────────────

/// Poisson arrivals with exponentially distributed packet lengths.
///
/// The first tick past `horizon` ends the process and is not emitted.
pub fn generate_arrivals<R: Rng + ?Sized>(
    rng: &mut R,
    rate: f64,
    mean_length_bits: f64,
    horizon: f64,
) -> Vec<Event> {
    let mut events = Vec::with_capacity(expected_count(rate, horizon));
    let mut time = 0.0;
    let mut id = 1;
    loop {
        time += exponential(rng, rate);
        let length = exponential(rng, 1.0 / mean_length_bits);
        if time > horizon {
            break;
        }
        events.push(Event::arrival(id, time, length));
        id += 1;
    }
    events
}

/// Poisson observer instants.
pub fn generate_observations<R: Rng + ?Sized>(rng: &mut R, rate: f64, horizon: f64) -> Vec<Event> {
    let mut events = Vec::with_capacity(expected_count(rate, horizon));
    let mut time = 0.0;
    let mut id = 1;
    loop {
        time += exponential(rng, rate);
        if time > horizon {
            break;
        }
        events.push(Event::observation(id, time));
        id += 1;
    }
    events
}

fn expected_count(rate: f64, horizon: f64) -> usize {
    // Headroom over the mean so the buffer rarely grows.
    (rate * horizon * 1.05).min(1e8) as usize
}
