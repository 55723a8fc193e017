//! Console logging configuration.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct TelemetryConfig {
    /// `tracing_subscriber::EnvFilter` directives; `RUST_LOG` overrides it.
    #[serde(default = "default_log_filter")]
    #[validate(length(min = 1))]
    pub log_filter: String,

    /// Prefix console lines with an RFC 3339 timestamp.
    #[serde(default)]
    pub show_timestamps: bool,
}

fn default_log_filter() -> String {
    "info".into()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            show_timestamps: false,
        }
    }
}
