// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Queue Arena - Run Configuration
//
// Parameters of one M/M/1/K run. Built by the driver, validated before any
// event is generated, then read-only for the whole run.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::Capacity;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Observer rate as a multiple of the arrival rate used by `from_load`.
pub const OBSERVER_RATE_FACTOR: f64 = 5.0;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be positive and finite, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("buffer capacity must hold at least one packet")]
    ZeroCapacity,
}

// ---------------------------------------------------------------------------
// SimConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimConfig {
    /// Packet arrival rate λ (packets/s).
    pub arrival_rate: f64,
    /// Mean packet length L (bits).
    pub mean_packet_length_bits: f64,
    /// Simulated time T (s).
    pub horizon: f64,
    /// Observer rate α (samples/s).
    pub observer_rate: f64,
    /// Link rate C (bits/s).
    pub link_rate_bps: f64,
    #[serde(default)]
    pub capacity: Capacity,
}

impl SimConfig {
    /// Configuration for an offered load `rho = λL/C`.
    pub fn from_load(
        rho: f64,
        mean_packet_length_bits: f64,
        link_rate_bps: f64,
        horizon: f64,
        capacity: Capacity,
    ) -> Self {
        let arrival_rate = rho * link_rate_bps / mean_packet_length_bits;
        Self {
            arrival_rate,
            mean_packet_length_bits,
            horizon,
            observer_rate: OBSERVER_RATE_FACTOR * arrival_rate,
            link_rate_bps,
            capacity,
        }
    }

    pub fn offered_load(&self) -> f64 {
        self.arrival_rate * self.mean_packet_length_bits / self.link_rate_bps
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("arrival_rate", self.arrival_rate)?;
        positive("mean_packet_length_bits", self.mean_packet_length_bits)?;
        positive("horizon", self.horizon)?;
        positive("observer_rate", self.observer_rate)?;
        positive("link_rate_bps", self.link_rate_bps)?;
        if self.capacity == Capacity::Finite(0) {
            return Err(ConfigError::ZeroCapacity);
        }

        if self.observer_rate < OBSERVER_RATE_FACTOR * self.arrival_rate {
            warn!(
                observer_rate = self.observer_rate,
                arrival_rate = self.arrival_rate,
                "observer rate below {}x arrival rate",
                OBSERVER_RATE_FACTOR
            );
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}
