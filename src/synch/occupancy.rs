//! Occupancy tracking and the admission rule
//!
//! The table only counts vehicles per path. Whether a new vehicle may join
//! them is decided by [`legal_to_go`], which reads the table but never
//! changes it.

use super::direction::{is_right_turn, Direction, Path, NUM_DIRECTIONS};

const NUM_SLOTS: usize = NUM_DIRECTIONS * NUM_DIRECTIONS;

/// Number of vehicles currently inside the intersection, per path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyTable {
    /// Indexed by `Path::slot`. U-turn slots stay at zero.
    counts: [u32; NUM_SLOTS],
    total: u32,
}

impl OccupancyTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Vehicles currently on the given path
    pub fn count(&self, path: Path) -> u32 {
        self.counts[path.slot()]
    }

    /// Vehicles currently inside the intersection on any path
    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Iterate over paths that have at least one vehicle on them
    pub fn active_paths(&self) -> impl Iterator<Item = (Path, u32)> + '_ {
        Path::all()
            .map(move |path| (path, self.count(path)))
            .filter(|&(_, count)| count > 0)
    }

    /// Add a vehicle on `path`, returning the new count for that path
    pub fn increment(&mut self, path: Path) -> u32 {
        let slot = &mut self.counts[path.slot()];
        *slot += 1;
        self.total += 1;
        *slot
    }

    /// Remove a vehicle from `path`, returning the new count for that path.
    ///
    /// Returns `None` and leaves the table untouched if nobody is on the path.
    pub fn decrement(&mut self, path: Path) -> Option<u32> {
        let slot = &mut self.counts[path.slot()];
        if *slot == 0 {
            return None;
        }
        *slot -= 1;
        self.total -= 1;
        Some(*slot)
    }

    /// Whether a vehicle on `path` may enter right now
    pub fn is_legal(&self, path: Path) -> bool {
        legal_to_go(path.origin(), path.destination(), self)
    }
}

/// Two paths may share the intersection when the candidate follows the same
/// path, the exact opposing path, or turns right into a different lane.
fn compatible(origin: Direction, destination: Direction, active: Path) -> bool {
    let (i, j) = (active.origin(), active.destination());
    (origin == i && destination == j)
        || (origin == j && destination == i)
        || (destination != j && is_right_turn(origin, destination))
}

/// Decide whether a vehicle going `origin -> destination` may enter.
///
/// Every occupied path must be compatible with the candidate; a single
/// conflict rejects the whole request.
pub fn legal_to_go(origin: Direction, destination: Direction, occupancy: &OccupancyTable) -> bool {
    occupancy
        .active_paths()
        .all(|(active, _)| compatible(origin, destination, active))
}
