//! # Movement Models for Simulation
//!
//! ## Models:
//! - `RandomWalk`: adds an independent uniform offset to each axis.
//! - `Stationary`: leaves the position unchanged.

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use fleettrack_config::SimulationConfig;
use fleettrack_core::Position;

/// Trait for movement models.
pub trait MovementModel: Send {
    /// Computes the position following `current`.
    fn next_position(&mut self, current: Position) -> Position;
}

/// Uniform random walk bounded by `max_offset` degrees per axis and step.
#[derive(Debug)]
pub struct RandomWalk {
    max_offset: f64,
    rng: StdRng,
}

impl RandomWalk {
    /// Creates a random walk seeded from the OS.
    pub fn new(max_offset: f64) -> Self {
        Self {
            max_offset,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a reproducible random walk.
    pub fn seeded(max_offset: f64, seed: u64) -> Self {
        Self {
            max_offset,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Builds the walk for one simulation. With a configured seed, `stream`
    /// selects a distinct but reproducible sequence per simulation.
    pub fn from_config(config: &SimulationConfig, stream: u64) -> Self {
        match config.seed {
            Some(seed) => Self::seeded(config.max_offset_degrees, seed.wrapping_add(stream)),
            None => Self::new(config.max_offset_degrees),
        }
    }
}

impl MovementModel for RandomWalk {
    #[inline]
    fn next_position(&mut self, current: Position) -> Position {
        let d_lat = self.rng.random_range(-self.max_offset..=self.max_offset);
        let d_lon = self.rng.random_range(-self.max_offset..=self.max_offset);
        Position::new(current.latitude + d_lat, current.longitude + d_lon)
    }
}

/// A model that never moves.
#[derive(Debug, Clone, Copy)]
pub struct Stationary;

impl MovementModel for Stationary {
    #[inline]
    fn next_position(&mut self, current: Position) -> Position {
        current
    }
}
