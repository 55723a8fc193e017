//! # Fleet Tracker Configuration System
//!
//! Layered configuration for the fleet tracker.
//!
//! Hierarchy:
//! 1. Default values
//! 2. `config/fleettrack.yaml`, if present
//! 3. `FLEETTRACK_*` environment variables (`__` separates nesting levels)

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod error;
mod simulator;
mod telemetry;
mod validation;

pub use error::ConfigError;
pub use simulator::SimulationConfig;
pub use telemetry::TelemetryConfig;

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/fleettrack.yaml";

const ENV_PREFIX: &str = "FLEETTRACK_";

/// Top-level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone)]
pub struct FleetConfig {
    /// Movement simulation parameters.
    #[serde(default)]
    #[validate(nested)]
    pub simulation: SimulationConfig,

    /// Console logging parameters.
    #[serde(default)]
    #[validate(nested)]
    pub telemetry: TelemetryConfig,
}

impl FleetConfig {
    /// Load configuration from the default file and the environment.
    ///
    /// A missing `config/fleettrack.yaml` is not an error; defaults are used.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(FleetConfig::default()));

        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            figment = figment.merge(Yaml::file(DEFAULT_CONFIG_PATH));
        }

        Self::extract(figment)
    }

    /// Load configuration from an explicit path. The file must exist.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let figment =
            Figment::from(Serialized::defaults(FleetConfig::default())).merge(Yaml::file(path));
        Self::extract(figment)
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}
