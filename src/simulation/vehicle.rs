//! A single vehicle thread
//!
//! Each vehicle repeatedly arrives from a random direction, waits for the
//! monitor to let it in, spends some time crossing and then leaves.

use anyhow::{bail, Context, Result};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand::SeedableRng;
use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use super::checker::CrossingLog;
use super::config::SimConfig;
use crate::synch::{IntersectionMonitor, Path};

/// Identifier for a vehicle thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub usize);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What one vehicle did over its whole run
#[derive(Debug, Clone, Default)]
pub struct VehicleTally {
    pub crossings: usize,
    pub right_turns: usize,
    pub conflicts: usize,
    /// Total time spent between arriving and being admitted
    pub waited: Duration,
}

/// Pick the RNG for a vehicle: derived from the run seed if there is one
pub(crate) fn vehicle_rng(seed: Option<u64>, id: VehicleId) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(id.0 as u64)),
        None => StdRng::seed_from_u64(rand::rng().random()),
    }
}

/// Spend `dwell` inside the intersection, then leave.
///
/// The monitor is always released, even when the crossing log has lost
/// track of the vehicle, so waiters are never stranded behind it. Returns
/// the conflicts the log found on arrival.
pub(crate) fn cross(
    id: VehicleId,
    path: Path,
    dwell: Duration,
    monitor: &IntersectionMonitor,
    log: &CrossingLog,
) -> Result<usize> {
    let conflicts = log.arrive(id, path);
    thread::sleep(dwell);
    let recorded = log.depart(id);

    monitor.after_exit(path.origin(), path.destination());

    if !recorded {
        bail!("Vehicle {} left without being recorded inside", id);
    }
    Ok(conflicts)
}

/// Run one vehicle to completion
pub(crate) fn run_vehicle(
    id: VehicleId,
    config: &SimConfig,
    monitor: &IntersectionMonitor,
    log: &CrossingLog,
) -> Result<VehicleTally> {
    let paths: Vec<Path> = Path::all().collect();
    let mut rng = vehicle_rng(config.seed, id);
    let mut tally = VehicleTally::default();

    for _ in 0..config.iterations {
        if config.max_arrival_ms > 0 {
            let pause = rng.random_range(0..=config.max_arrival_ms);
            thread::sleep(Duration::from_millis(pause));
        }

        let path = *paths.choose(&mut rng).context("No paths to choose from")?;

        let arrived = Instant::now();
        monitor.before_entry(path.origin(), path.destination());
        tally.waited += arrived.elapsed();

        tally.conflicts += cross(id, path, config.crossing_time(), monitor, log)?;

        tally.crossings += 1;
        if path.is_right_turn() {
            tally.right_turns += 1;
        }
    }

    debug!(
        "Vehicle {} finished {} crossings, waited {:?}",
        id, tally.crossings, tally.waited
    );
    Ok(tally)
}
