//! # Fleet Tracker Telemetry
//!
//! Crate for console logging and metrics.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
