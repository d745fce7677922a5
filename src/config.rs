//! Run configuration for the headless binary, read from JSON.
//!
//! ```json
//! {
//!   "execution": "parallel",
//!   "seed_triplets": 300,
//!   "tick_rate": 60.0,
//!   "feed_address": "127.0.0.1:9565",
//!   "parameters": { "max_speed": 1000.0, "boundary": "wrap" }
//! }
//! ```
//!
//! Every field is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::params::Parameters;
use crate::scheduler::Execution;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub parameters: Parameters,
    pub execution: Execution,
    /// Worker count; hardware concurrency when absent.
    pub workers: Option<usize>,
    pub seed: u64,
    pub seed_triplets: usize,
    /// Ticks per wall-clock second.
    pub tick_rate: f64,
    pub max_ticks: Option<u64>,
    pub feed_address: Option<String>,
    pub report_every: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            parameters: Parameters::default(),
            execution: Execution::Parallel,
            workers: None,
            seed: 0,
            seed_triplets: 300,
            tick_rate: 60.0,
            max_ticks: None,
            feed_address: None,
            report_every: 600,
        }
    }
}

impl RunConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.parameters.validate()?;
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return Err(SimError::InvalidParameter {
                name: "tick_rate",
                reason: "must be positive",
            });
        }
        if self.workers == Some(0) {
            return Err(SimError::InvalidParameter {
                name: "workers",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}
