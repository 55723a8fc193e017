//! Movement simulation configuration.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Pause between two simulated movement steps, in milliseconds.
    #[serde(default = "default_step_interval_ms")]
    #[validate(range(min = 1, max = 3_600_000))]
    pub step_interval_ms: u64,

    /// Largest per-axis offset applied in one step, in degrees.
    #[serde(default = "default_max_offset_degrees")]
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    #[validate(custom(function = validation::validate_finite))]
    pub max_offset_degrees: f64,

    /// Seed for reproducible movement; drawn from the OS when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_step_interval_ms() -> u64 {
    1000
}

fn default_max_offset_degrees() -> f64 {
    0.01
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step_interval_ms: default_step_interval_ms(),
            max_offset_degrees: default_max_offset_degrees(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn step_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.step_interval_ms)
    }
}
