//! The intersection monitor
//!
//! One mutex guards the occupancy table together with the wait bookkeeping.
//! Each path has its own condition variable; a vehicle that may not enter
//! parks on the queue for its path and re-checks the admission rule every
//! time it wakes up.

use anyhow::{Context, Result};
use log::{debug, info, trace};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use super::direction::{Direction, Path, NUM_DIRECTIONS, NUM_PATHS};
use super::occupancy::OccupancyTable;
use super::stats::MonitorStats;

/// Which wait queues get notified when the last vehicle leaves a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum WakePolicy {
    /// Notify every path's queue
    #[default]
    BroadcastAll,
    /// Notify only queues with waiters whose path has become legal
    LegalOnly,
}

/// Construction options for [`IntersectionMonitor`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MonitorConfig {
    pub wake_policy: WakePolicy,
}

/// Everything protected by the intersection lock
#[derive(Debug, Default)]
struct MonitorState {
    occupancy: OccupancyTable,
    /// Threads parked on each path's queue, indexed by `Path::slot`
    waiting: [u32; NUM_DIRECTIONS * NUM_DIRECTIONS],
    stats: MonitorStats,
}

/// Admission controller for a four-way intersection
///
/// Created by [`IntersectionMonitor::sync_init`] and shared between vehicle
/// threads by reference or behind an `Arc`. Dropping it, or calling
/// [`IntersectionMonitor::sync_cleanup`], releases the lock and every queue.
#[derive(Debug)]
pub struct IntersectionMonitor {
    state: Mutex<MonitorState>,
    /// One queue per slot; U-turn slots are never waited on
    queues: Vec<Condvar>,
    config: MonitorConfig,
}

fn poisoned<T>(_: PoisonError<T>) -> T {
    panic!("intersection lock poisoned by a thread that broke the monitor contract");
}

impl IntersectionMonitor {
    /// Create a monitor with the default broadcast wake policy
    pub fn sync_init() -> Result<Self> {
        Self::sync_init_with(MonitorConfig::default())
    }

    /// Create a monitor with an empty occupancy table and no waiters
    pub fn sync_init_with(config: MonitorConfig) -> Result<Self> {
        let slots = NUM_DIRECTIONS * NUM_DIRECTIONS;
        let mut queues = Vec::new();
        queues
            .try_reserve_exact(slots)
            .context("could not allocate intersection wait queues")?;
        queues.extend((0..slots).map(|_| Condvar::new()));

        info!(
            "Intersection monitor ready: {} paths, wake policy {:?}",
            NUM_PATHS, config.wake_policy
        );

        Ok(Self {
            state: Mutex::new(MonitorState::default()),
            queues,
            config,
        })
    }

    /// Tear the monitor down once every vehicle has left.
    ///
    /// Returns the final counters. Panics if any vehicle is still inside,
    /// since that means an `after_exit` call went missing.
    pub fn sync_cleanup(self) -> MonitorStats {
        let state = self.state.into_inner().unwrap_or_else(poisoned);
        if !state.occupancy.is_empty() {
            let active: Vec<String> = state
                .occupancy
                .active_paths()
                .map(|(path, count)| format!("{}x{}", path, count))
                .collect();
            panic!(
                "contract violation: cleanup with {} vehicle(s) still inside ({})",
                state.occupancy.total(),
                active.join(", ")
            );
        }
        info!("Intersection monitor released: {}", state.stats.summary());
        state.stats
    }

    /// Options the monitor was created with
    pub fn config(&self) -> MonitorConfig {
        self.config
    }

    fn lock_state(&self) -> MutexGuard<'_, MonitorState> {
        self.state.lock().unwrap_or_else(poisoned)
    }

    fn queue(&self, path: Path) -> &Condvar {
        &self.queues[path.slot()]
    }

    /// Block until a vehicle going `origin -> destination` may enter, then
    /// record it as inside the intersection.
    ///
    /// Panics if `origin == destination`.
    pub fn before_entry(&self, origin: Direction, destination: Direction) {
        let path = Path::from_contract(origin, destination);
        let mut state = self.lock_state();

        if !state.occupancy.is_legal(path) {
            state.stats.blocked_requests += 1;
            trace!("{} blocked, {} vehicle(s) inside", path, state.occupancy.total());

            while !state.occupancy.is_legal(path) {
                state.waiting[path.slot()] += 1;
                state = self.queue(path).wait(state).unwrap_or_else(poisoned);
                state.waiting[path.slot()] -= 1;
                state.stats.wakeups += 1;
                trace!("{} woke up", path);
            }
        }

        let count = state.occupancy.increment(path);
        let total = state.occupancy.total();
        state.stats.admitted += 1;
        state.stats.peak_occupancy = state.stats.peak_occupancy.max(total);
        debug!("{} entered ({} on path, {} inside)", path, count, total);
    }

    /// Record that a vehicle going `origin -> destination` has left.
    ///
    /// Panics if no vehicle is currently inside on that path.
    pub fn after_exit(&self, origin: Direction, destination: Direction) {
        let path = Path::from_contract(origin, destination);
        let mut state = self.lock_state();

        let Some(remaining) = state.occupancy.decrement(path) else {
            // Release the lock first so the table stays usable for diagnostics
            drop(state);
            panic!("contract violation: after_exit({}) with no vehicle on that path", path);
        };
        state.stats.departed += 1;
        debug!("{} left ({} still on path)", path, remaining);

        if remaining == 0 {
            self.wake_waiters(&mut state, path);
        }
    }

    /// Notify waiters after `emptied` lost its last vehicle. Must be called
    /// with the lock held.
    fn wake_waiters(&self, state: &mut MonitorState, emptied: Path) {
        let mut notified = 0;
        match self.config.wake_policy {
            WakePolicy::BroadcastAll => {
                for path in Path::all() {
                    self.queue(path).notify_all();
                    notified += 1;
                }
            }
            WakePolicy::LegalOnly => {
                for path in Path::all() {
                    if state.waiting[path.slot()] > 0 && state.occupancy.is_legal(path) {
                        self.queue(path).notify_all();
                        notified += 1;
                    }
                }
            }
        }
        state.stats.wake_rounds += 1;
        state.stats.queues_notified += notified;
        trace!("{} emptied, notified {} queue(s)", emptied, notified);
    }

    /// Copy of the current occupancy table
    pub fn occupancy_snapshot(&self) -> OccupancyTable {
        self.lock_state().occupancy.clone()
    }

    /// Vehicles currently inside the intersection
    pub fn vehicles_inside(&self) -> u32 {
        self.lock_state().occupancy.total()
    }

    /// Threads currently parked waiting for `path`
    pub fn waiting_on(&self, path: Path) -> u32 {
        self.lock_state().waiting[path.slot()]
    }

    /// Threads currently parked on any queue
    pub fn total_waiting(&self) -> u32 {
        self.lock_state().waiting.iter().sum()
    }

    /// Copy of the running counters
    pub fn stats(&self) -> MonitorStats {
        self.lock_state().stats
    }
}
