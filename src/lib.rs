// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Queue Arena - M/M/1/K discrete-event simulation

pub mod types;
pub mod config;
pub mod variate;
pub mod timeline;
pub mod simulation;
pub mod stats;

pub use types::*;
pub use config::{ConfigError, SimConfig};
pub use simulation::{QueueSimulation, RunOutcome, SimError};
pub use stats::{RunCounters, StatsError};
pub use timeline::EventTimeline;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

/// Browser handle: one configuration, one seeded source, repeated runs.
#[wasm_bindgen]
pub struct QueueArena {
    simulation: QueueSimulation,
    rng: ChaCha8Rng,
    last_timeline: Option<EventTimeline>,
}

#[wasm_bindgen]
impl QueueArena {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, seed: u64) -> Result<QueueArena, JsValue> {
        #[cfg(target_arch = "wasm32")]
        std::panic::set_hook(Box::new(console_error_panic_hook::hook));

        let config: SimConfig = serde_wasm_bindgen::from_value(config)?;
        let simulation = QueueSimulation::new(config).map_err(to_js_error)?;
        Ok(Self {
            simulation,
            rng: ChaCha8Rng::seed_from_u64(seed),
            last_timeline: None,
        })
    }

    /// Run once and return the summary object.
    pub fn run(&mut self) -> Result<JsValue, JsValue> {
        let (summary, timeline) = self
            .simulation
            .run_with_timeline(&mut self.rng)
            .map_err(to_js_error)?;
        self.last_timeline = Some(timeline);
        Ok(serde_wasm_bindgen::to_value(&summary)?)
    }

    /// Sorted event rows of the last run, or an empty array.
    pub fn events(&self) -> JsValue {
        let rows = self
            .last_timeline
            .as_ref()
            .map(EventTimeline::rows)
            .unwrap_or_default();
        serde_wasm_bindgen::to_value(&rows).unwrap_or(JsValue::NULL)
    }

    pub fn offered_load(&self) -> f64 {
        self.simulation.config().offered_load()
    }
}

fn to_js_error<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}
