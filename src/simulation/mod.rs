//! Threaded vehicle simulation
//!
//! Drives an [`IntersectionMonitor`](crate::synch::IntersectionMonitor) with
//! many vehicle threads and independently checks that no two vehicles inside
//! the intersection are on crossing paths. It can be run from the console
//! binary or directly from tests.

mod checker;
mod config;
mod driver;
mod vehicle;

pub use checker::{paths_compatible, CrossingLog, Violation};
pub use config::{
    SimConfig, DEFAULT_CROSSING_MS, DEFAULT_ITERATIONS, DEFAULT_MAX_ARRIVAL_MS, DEFAULT_VEHICLES,
};
pub use driver::{run_simulation, SimReport};
pub use vehicle::{VehicleId, VehicleTally};
