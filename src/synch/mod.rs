//! Intersection admission control
//!
//! This module contains the synchronization core: the direction domain, the
//! occupancy table with its admission rule, and the monitor that vehicle
//! threads call before entering and after leaving the intersection.

mod direction;
mod monitor;
mod occupancy;
mod stats;

pub use direction::{is_right_turn, Direction, Path, NUM_DIRECTIONS, NUM_PATHS};
pub use monitor::{IntersectionMonitor, MonitorConfig, WakePolicy};
pub use occupancy::{legal_to_go, OccupancyTable};
pub use stats::MonitorStats;
