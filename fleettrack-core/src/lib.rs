//! # fleettrack-core
//!
//! In-memory fleet model: vehicles with their position history and the
//! registry that owns them.
//!
//! ### Key Submodules:
//! - `vehicle`: a single vehicle record and its append-only track
//! - `fleet`: identifier to vehicle mapping, shared between the shell and
//!   simulation tasks
//! - `error`: not-found and duplicate conditions

pub mod error;
pub mod fleet;
pub mod vehicle;

pub mod prelude {
    pub use crate::error::*;
    pub use crate::fleet::*;
    pub use crate::vehicle::*;
}

pub use error::FleetError;
pub use fleet::{Fleet, SharedVehicle};
pub use vehicle::{Position, TrackPoint, Vehicle};
