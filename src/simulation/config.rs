//! Simulation parameters

use anyhow::{bail, Result};
use std::time::Duration;

use crate::synch::WakePolicy;

/// Default number of concurrently running vehicle threads
pub const DEFAULT_VEHICLES: usize = 10;

/// Default number of crossings each vehicle makes
pub const DEFAULT_ITERATIONS: usize = 100;

/// Default upper bound on the pause before each arrival, in milliseconds
pub const DEFAULT_MAX_ARRIVAL_MS: u64 = 2;

/// Default time spent inside the intersection, in milliseconds
pub const DEFAULT_CROSSING_MS: u64 = 1;

/// Parameters for one simulation run
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of vehicle threads
    pub vehicles: usize,
    /// Crossings per vehicle
    pub iterations: usize,
    /// Each arrival waits a random time in `0..=max_arrival_ms`
    pub max_arrival_ms: u64,
    /// Time each vehicle spends inside the intersection
    pub crossing_ms: u64,
    /// Seed for reproducible path choices; random when `None`
    pub seed: Option<u64>,
    pub wake_policy: WakePolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            vehicles: DEFAULT_VEHICLES,
            iterations: DEFAULT_ITERATIONS,
            max_arrival_ms: DEFAULT_MAX_ARRIVAL_MS,
            crossing_ms: DEFAULT_CROSSING_MS,
            seed: None,
            wake_policy: WakePolicy::default(),
        }
    }
}

impl SimConfig {
    /// Check that the run would actually do something
    pub fn validate(&self) -> Result<()> {
        if self.vehicles == 0 {
            bail!("At least one vehicle is required");
        }
        if self.iterations == 0 {
            bail!("Vehicles must make at least one crossing");
        }
        Ok(())
    }

    pub fn crossing_time(&self) -> Duration {
        Duration::from_millis(self.crossing_ms)
    }
}
