//! ## fleettrack-core::vehicle
//! **Vehicle record with append-only position history**
//!
//! Every accepted update is timestamped with local wall-clock time at second
//! precision and appended to the track, so the last track point always
//! matches the current position.

use std::fmt;

use chrono::{DateTime, Local, SubsecRound};
use tracing::info;

/// Format used for track point timestamps on the console.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A latitude/longitude pair in degrees. No range is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})",
            Coordinate(self.latitude),
            Coordinate(self.longitude)
        )
    }
}

/// Shortest round-trip digits, with exponents written as `e-07` / `e+16`.
struct Coordinate(f64);

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_nan() {
            return f.write_str("nan");
        }
        let digits = format!("{:?}", self.0);
        match digits.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, magnitude) = match exponent.strip_prefix('-') {
                    Some(magnitude) => ('-', magnitude),
                    None => ('+', exponent),
                };
                write!(f, "{mantissa}e{sign}{magnitude:0>2}")
            }
            None => f.write_str(&digits),
        }
    }
}

/// One history entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Local>,
}

impl TrackPoint {
    pub fn position(&self) -> Position {
        Position::new(self.latitude, self.longitude)
    }
}

impl fmt::Display for TrackPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}",
            self.position(),
            self.timestamp.format(TIMESTAMP_FORMAT)
        )
    }
}

#[derive(Debug, Clone)]
pub struct Vehicle {
    id: String,
    position: Position,
    history: Vec<TrackPoint>,
}

impl Vehicle {
    /// Creates a vehicle at `position` with an empty history.
    pub fn new(id: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            position,
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Overwrites the current position and records it in the history.
    pub fn update_position(&mut self, latitude: f64, longitude: f64) -> TrackPoint {
        self.position = Position::new(latitude, longitude);
        let point = TrackPoint {
            latitude,
            longitude,
            timestamp: Local::now().trunc_subsecs(0),
        };
        self.history.push(point);
        info!(
            "Vehicle {} updated position to {} at {}",
            self.id,
            self.position,
            point.timestamp.format(TIMESTAMP_FORMAT)
        );
        point
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Every accepted update, oldest first.
    pub fn tracking_data(&self) -> &[TrackPoint] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use tracing_test::traced_test;

    #[test]
    fn new_vehicle_has_empty_history() {
        let vehicle = Vehicle::new("v1", Position::new(10.0, 20.0));
        assert_eq!(vehicle.id(), "v1");
        assert_eq!(vehicle.position(), Position::new(10.0, 20.0));
        assert!(vehicle.tracking_data().is_empty());
    }

    #[traced_test]
    #[test]
    fn update_appends_history_in_order() {
        let mut vehicle = Vehicle::new("v1", Position::default());
        vehicle.update_position(1.0, 2.0);
        let last = vehicle.update_position(3.5, -4.25);

        assert_eq!(vehicle.position(), Position::new(3.5, -4.25));
        let history = vehicle.tracking_data();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].position(), Position::new(1.0, 2.0));
        assert_eq!(history[1], last);
        assert!(history[0].timestamp <= history[1].timestamp);
        assert!(logs_contain("Vehicle v1 updated position to (3.5, -4.25) at"));
    }

    #[test]
    fn timestamps_have_second_precision() {
        let mut vehicle = Vehicle::new("v1", Position::default());
        let point = vehicle.update_position(0.5, 0.5);
        assert_eq!(point.timestamp.nanosecond(), 0);
    }

    #[test]
    fn out_of_range_coordinates_are_accepted() {
        let mut vehicle = Vehicle::new("v1", Position::default());
        vehicle.update_position(123.0, -540.0);
        assert_eq!(vehicle.position(), Position::new(123.0, -540.0));
    }

    #[test]
    fn position_display_keeps_decimal_point() {
        assert_eq!(Position::new(10.0, 20.5).to_string(), "(10.0, 20.5)");
    }

    #[test]
    fn position_display_pads_exponents() {
        assert_eq!(Position::new(1e-7, 1e16).to_string(), "(1e-07, 1e+16)");
        assert_eq!(Position::new(-2.5e-5, 1.5e300).to_string(), "(-2.5e-05, 1.5e+300)");
        assert_eq!(Position::new(0.0001, -0.0).to_string(), "(0.0001, -0.0)");
        assert_eq!(
            Position::new(f64::NAN, f64::NEG_INFINITY).to_string(),
            "(nan, -inf)"
        );
    }
}
