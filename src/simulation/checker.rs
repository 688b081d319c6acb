//! Independent safety check for vehicles inside the intersection
//!
//! The log is kept separately from the monitor's own table so a bug in the
//! admission rule shows up as a recorded violation instead of going unseen.

use log::error;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::vehicle::VehicleId;
use crate::synch::Path;

/// Whether two vehicles can be inside the intersection together: same path,
/// opposing paths, or different destinations with at least one right turn.
pub fn paths_compatible(a: Path, b: Path) -> bool {
    a == b
        || a == b.reverse()
        || (a.destination() != b.destination() && (a.is_right_turn() || b.is_right_turn()))
}

/// Two vehicles found inside the intersection on crossing paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub arriving: (VehicleId, Path),
    pub occupant: (VehicleId, Path),
}

#[derive(Debug, Default)]
struct LogState {
    inside: Vec<(VehicleId, Path)>,
    violations: Vec<Violation>,
    peak: usize,
}

/// Record of which vehicles are currently inside the intersection
#[derive(Debug, Default)]
pub struct CrossingLog {
    state: Mutex<LogState>,
}

impl CrossingLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_state(&self) -> MutexGuard<'_, LogState> {
        // A poisoned log still holds every recorded violation
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a vehicle entering, checking it against everyone already inside.
    ///
    /// Returns the number of conflicts found for this arrival.
    pub fn arrive(&self, vehicle: VehicleId, path: Path) -> usize {
        let mut state = self.lock_state();
        let conflicts: Vec<Violation> = state
            .inside
            .iter()
            .filter(|&&(_, other)| !paths_compatible(path, other))
            .map(|&occupant| Violation {
                arriving: (vehicle, path),
                occupant,
            })
            .collect();

        for v in &conflicts {
            error!(
                "Vehicle {} on {} entered while vehicle {} is on {}",
                v.arriving.0, v.arriving.1, v.occupant.0, v.occupant.1
            );
        }

        let found = conflicts.len();
        state.violations.extend(conflicts);
        state.inside.push((vehicle, path));
        state.peak = state.peak.max(state.inside.len());
        found
    }

    /// Record a vehicle leaving. Returns false if it was not inside.
    pub fn depart(&self, vehicle: VehicleId) -> bool {
        let mut state = self.lock_state();
        match state.inside.iter().position(|&(id, _)| id == vehicle) {
            Some(index) => {
                state.inside.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Vehicles currently recorded as inside
    pub fn inside(&self) -> Vec<(VehicleId, Path)> {
        self.lock_state().inside.clone()
    }

    pub fn violations(&self) -> Vec<Violation> {
        self.lock_state().violations.clone()
    }

    /// Most vehicles seen inside at once
    pub fn peak(&self) -> usize {
        self.lock_state().peak
    }
}
