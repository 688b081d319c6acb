//! Runs a full simulation: one monitor, many vehicle threads

use anyhow::{anyhow, Context, Result};
use log::info;
use std::thread;
use std::time::{Duration, Instant};

use super::checker::{CrossingLog, Violation};
use super::config::SimConfig;
use super::vehicle::{run_vehicle, VehicleId, VehicleTally};
use crate::synch::{IntersectionMonitor, MonitorConfig, MonitorStats};

/// Outcome of a simulation run
#[derive(Debug, Clone)]
pub struct SimReport {
    pub vehicles: usize,
    pub crossings: usize,
    pub right_turns: usize,
    /// Conflicting occupants the vehicles found on arrival, summed
    pub conflicts: usize,
    pub elapsed: Duration,
    /// Sum of every vehicle's time spent waiting to enter
    pub total_wait: Duration,
    /// Most vehicles the crossing log saw inside at once
    pub peak_inside: usize,
    pub violations: Vec<Violation>,
    pub monitor: MonitorStats,
}

impl SimReport {
    pub fn is_safe(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn average_wait(&self) -> Duration {
        if self.crossings > 0 {
            self.total_wait / self.crossings as u32
        } else {
            Duration::ZERO
        }
    }

    /// Log the end-of-run statistics
    pub fn log_summary(&self) {
        info!("=== SIMULATION COMPLETE ===");
        info!("Elapsed time: {:.2}s", self.elapsed.as_secs_f64());
        info!("Vehicles: {}", self.vehicles);
        info!("Total crossings: {}", self.crossings);
        info!("Right turns: {}", self.right_turns);
        info!("Average wait: {:?}", self.average_wait());
        info!("Peak vehicles inside: {}", self.peak_inside);
        info!("Blocked requests: {}", self.monitor.blocked_requests);
        info!("Wakeups: {}", self.monitor.wakeups);
        info!(
            "Wake rounds: {} ({} queues notified)",
            self.monitor.wake_rounds, self.monitor.queues_notified
        );
        info!("Conflicts on arrival: {}", self.conflicts);
        info!("Violations: {}", self.violations.len());
    }
}

/// Run `config.vehicles` threads against a fresh monitor and collect the
/// results once every thread has finished.
pub fn run_simulation(config: &SimConfig) -> Result<SimReport> {
    config.validate()?;

    let monitor = IntersectionMonitor::sync_init_with(MonitorConfig {
        wake_policy: config.wake_policy,
    })
    .context("Failed to initialize intersection monitor")?;
    let log = CrossingLog::new();

    info!(
        "Starting {} vehicles x {} crossings (seed {:?})",
        config.vehicles, config.iterations, config.seed
    );
    let started = Instant::now();

    let tallies = thread::scope(|scope| -> Result<Vec<VehicleTally>> {
        let mut handles = Vec::with_capacity(config.vehicles);
        for n in 0..config.vehicles {
            let id = VehicleId(n);
            let (monitor, log) = (&monitor, &log);
            let handle = thread::Builder::new()
                .name(format!("vehicle-{}", n))
                .spawn_scoped(scope, move || run_vehicle(id, config, monitor, log))
                .with_context(|| format!("Failed to spawn vehicle {}", id))?;
            handles.push((id, handle));
        }

        handles
            .into_iter()
            .map(|(id, handle)| {
                handle
                    .join()
                    .map_err(|_| anyhow!("Vehicle {} panicked", id))?
            })
            .collect()
    })?;

    let elapsed = started.elapsed();
    let monitor_stats = monitor.sync_cleanup();

    Ok(SimReport {
        vehicles: config.vehicles,
        crossings: tallies.iter().map(|t| t.crossings).sum(),
        right_turns: tallies.iter().map(|t| t.right_turns).sum(),
        conflicts: tallies.iter().map(|t| t.conflicts).sum(),
        elapsed,
        total_wait: tallies.iter().map(|t| t.waited).sum(),
        peak_inside: log.peak(),
        violations: log.violations(),
        monitor: monitor_stats,
    })
}
