// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Queue Arena - Type Definitions

use serde::{Deserialize, Serialize};

// ─── Event Kind ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Arrival,
    Observation,
    Departure,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arrival => "ARRIVAL",
            Self::Observation => "OBSERVATION",
            Self::Departure => "DEPARTURE",
        }
    }
}

// ─── Event ───────────────────────────────────────────────────────────────────

/// One point on the simulation clock.
///
/// Ids are per generating process: the n-th arrival and the n-th observation
/// share id `n`, and a departure carries the id of the arrival it serves.
/// Packet lengths are in bits. Observers carry no service demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    Arrival { id: u64, time: f64, length: f64 },
    Observation { id: u64, time: f64 },
    Departure { id: u64, time: f64, length: f64 },
}

impl Event {
    pub fn arrival(id: u64, time: f64, length: f64) -> Self {
        debug_assert!(time >= 0.0, "arrival at negative time {time}");
        Self::Arrival { id, time, length }
    }

    pub fn observation(id: u64, time: f64) -> Self {
        debug_assert!(time >= 0.0, "observation at negative time {time}");
        Self::Observation { id, time }
    }

    pub fn departure(id: u64, time: f64, length: f64) -> Self {
        debug_assert!(time >= 0.0, "departure at negative time {time}");
        Self::Departure { id, time, length }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Self::Arrival { .. } => EventKind::Arrival,
            Self::Observation { .. } => EventKind::Observation,
            Self::Departure { .. } => EventKind::Departure,
        }
    }

    pub fn id(&self) -> u64 {
        match *self {
            Self::Arrival { id, .. } | Self::Observation { id, .. } | Self::Departure { id, .. } => id,
        }
    }

    pub fn time(&self) -> f64 {
        match *self {
            Self::Arrival { time, .. }
            | Self::Observation { time, .. }
            | Self::Departure { time, .. } => time,
        }
    }

    /// Service demand in bits, `None` for observers.
    pub fn packet_length(&self) -> Option<f64> {
        match *self {
            Self::Arrival { length, .. } | Self::Departure { length, .. } => Some(length),
            Self::Observation { .. } => None,
        }
    }
}

// ─── Buffer Capacity ─────────────────────────────────────────────────────────

/// How many packets the system holds, the one in service included.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Capacity {
    Finite(u32),
    Unbounded,
}

impl Default for Capacity {
    fn default() -> Self { Capacity::Unbounded }
}

impl Capacity {
    pub fn admits(&self, occupancy: u64) -> bool {
        match self {
            Self::Finite(k) => occupancy < u64::from(*k),
            Self::Unbounded => true,
        }
    }

    pub fn limit(&self) -> Option<u32> {
        match self {
            Self::Finite(k) => Some(*k),
            Self::Unbounded => None,
        }
    }
}

impl std::fmt::Display for Capacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finite(k) => write!(f, "{k}"),
            Self::Unbounded => write!(f, "inf"),
        }
    }
}

// ─── SimSummary ──────────────────────────────────────────────────────────────

/// Output of one run, consumed by whatever exports or prints it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimSummary {
    /// Every arrival generated inside the horizon, admitted or not.
    pub arrivals: u64,
    pub accepted: u64,
    pub dropped: u64,
    pub observations: u64,
    pub departures: u64,
    pub mean_occupancy: f64,
    pub idle_probability: f64,
    pub loss_probability: f64,
}

// ─── EventRow ────────────────────────────────────────────────────────────────

/// Flat, tabular view of an event for debugging exports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRow {
    pub kind: EventKind,
    pub time: f64,
    pub packet_length: Option<f64>,
}

impl From<&Event> for EventRow {
    fn from(event: &Event) -> Self {
        Self {
            kind: event.kind(),
            time: event.time(),
            packet_length: event.packet_length(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observations_carry_no_length() {
        let o = Event::observation(3, 1.5);
        assert_eq!(o.kind(), EventKind::Observation);
        assert_eq!(o.packet_length(), None);
        assert_eq!(o.id(), 3);

        let a = Event::arrival(3, 1.0, 2000.0);
        assert_eq!(a.packet_length(), Some(2000.0));
        assert_eq!(EventRow::from(&a).kind.as_str(), "ARRIVAL");
    }

    #[test]
    fn finite_capacity_admits_below_limit() {
        let k = Capacity::Finite(2);
        assert!(k.admits(0));
        assert!(k.admits(1));
        assert!(!k.admits(2));
        assert!(Capacity::Unbounded.admits(u64::MAX - 1));
        assert_eq!(k.to_string(), "2");
        assert_eq!(Capacity::Unbounded.to_string(), "inf");
    }

    #[test]
    fn summary_uses_camel_case_keys() {
        let summary = SimSummary {
            arrivals: 10, accepted: 8, dropped: 2, observations: 50, departures: 8,
            mean_occupancy: 1.25, idle_probability: 0.3, loss_probability: 0.2,
        };
        let json = serde_json::to_value(&summary).unwrap();
        for key in ["arrivals", "observations", "departures", "meanOccupancy", "idleProbability", "lossProbability"] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn capacity_serializes_as_tagged_value() {
        assert_eq!(serde_json::to_string(&Capacity::Finite(10)).unwrap(), r#"{"finite":10}"#);
        assert_eq!(serde_json::to_string(&Capacity::Unbounded).unwrap(), r#""unbounded""#);
    }
}
