use std::process::Command;

use intersection_synch::simulation::{run_simulation, CrossingLog, SimConfig, VehicleId};
use intersection_synch::synch::{Direction, Path, WakePolicy};

use Direction::{East, North, South, West};

fn path(origin: Direction, destination: Direction) -> Path {
    Path::new(origin, destination).unwrap()
}

fn quick_config(seed: u64, wake_policy: WakePolicy) -> SimConfig {
    SimConfig {
        vehicles: 8,
        iterations: 40,
        max_arrival_ms: 1,
        crossing_ms: 1,
        seed: Some(seed),
        wake_policy,
    }
}

fn run_binary(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_intersection_synch"))
        .args(args)
        .env("RUST_LOG", "warn,intersection_synch=info")
        .output()
        .expect("Failed to execute simulation")
}

/// Every vehicle finishes every crossing and nobody collides
#[test]
fn test_simulation_completes_safely() {
    for seed in [1, 7, 42] {
        let report = run_simulation(&quick_config(seed, WakePolicy::BroadcastAll))
            .expect("Simulation failed");

        assert!(report.is_safe(), "Violations: {:?}", report.violations);
        assert_eq!(report.conflicts, 0);
        assert_eq!(report.vehicles, 8);
        assert_eq!(report.crossings, 8 * 40);
        assert_eq!(report.monitor.admitted, 8 * 40);
        assert_eq!(report.monitor.departed, 8 * 40);
        assert!(report.peak_inside >= 1);
        assert!(report.monitor.peak_occupancy as usize >= report.peak_inside);
    }
}

#[test]
fn test_simulation_with_targeted_wakeups() {
    let report = run_simulation(&quick_config(3, WakePolicy::LegalOnly))
        .expect("Simulation failed");

    assert!(report.is_safe(), "Violations: {:?}", report.violations);
    assert_eq!(report.crossings, 8 * 40);
    assert!(report.monitor.queues_notified <= report.monitor.wake_rounds * 12);
}

#[test]
fn test_single_vehicle_never_waits() {
    let config = SimConfig {
        vehicles: 1,
        iterations: 25,
        max_arrival_ms: 0,
        crossing_ms: 0,
        seed: Some(5),
        wake_policy: WakePolicy::BroadcastAll,
    };
    let report = run_simulation(&config).expect("Simulation failed");

    assert_eq!(report.crossings, 25);
    assert_eq!(report.monitor.blocked_requests, 0);
    assert_eq!(report.monitor.wakeups, 0);
    assert_eq!(report.peak_inside, 1);
    // Every exit empties the only occupied path
    assert_eq!(report.monitor.wake_rounds, 25);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = SimConfig {
        vehicles: 0,
        ..SimConfig::default()
    };
    assert!(run_simulation(&config).is_err());

    let config = SimConfig {
        iterations: 0,
        ..SimConfig::default()
    };
    assert!(run_simulation(&config).is_err());
}

#[test]
fn test_crossing_log_flags_merging_vehicles() {
    let log = CrossingLog::new();
    assert_eq!(log.arrive(VehicleId(0), path(North, South)), 0);
    assert_eq!(log.arrive(VehicleId(1), path(East, South)), 1);

    let violations = log.violations();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].arriving, (VehicleId(1), path(East, South)));
    assert_eq!(violations[0].occupant, (VehicleId(0), path(North, South)));
}

#[test]
fn test_crossing_log_accepts_compatible_vehicles() {
    let log = CrossingLog::new();
    assert_eq!(log.arrive(VehicleId(0), path(North, South)), 0);
    assert_eq!(log.arrive(VehicleId(1), path(South, North)), 0);
    assert_eq!(log.arrive(VehicleId(2), path(North, South)), 0);
    // A right turn still may not merge into an occupied lane
    assert_eq!(log.arrive(VehicleId(3), path(East, North)), 1);
    assert_eq!(log.arrive(VehicleId(4), path(West, South)), 2);
    assert_eq!(log.violations().len(), 3);
}

#[test]
fn test_crossing_log_tracks_departures_and_peak() {
    let log = CrossingLog::new();
    assert!(!log.depart(VehicleId(9)));

    log.arrive(VehicleId(0), path(North, West));
    log.arrive(VehicleId(1), path(South, East));
    log.arrive(VehicleId(2), path(North, West));
    assert_eq!(log.peak(), 3);
    assert_eq!(log.inside().len(), 3);

    assert!(log.depart(VehicleId(1)));
    assert!(!log.depart(VehicleId(1)));
    let inside = log.inside();
    assert_eq!(inside.len(), 2);
    assert!(inside.iter().all(|&(id, _)| id != VehicleId(1)));

    log.arrive(VehicleId(3), path(South, North));
    assert_eq!(log.peak(), 3);
    assert!(log.violations().is_empty());
}

/// Test that the binary runs and logs its statistics
#[test]
fn test_binary_logs_statistics() {
    let output = run_binary(&[
        "--vehicles",
        "4",
        "--iterations",
        "10",
        "--seed",
        "11",
        "--wake-policy",
        "legal-only",
    ]);

    assert!(
        output.status.success(),
        "Simulation failed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );

    // Parse the number - handle log format with timestamp
    let crossings_line = stderr
        .lines()
        .find(|line| line.contains("Total crossings:"))
        .expect("Could not find 'Total crossings' line");
    let parts: Vec<&str> = crossings_line.split("Total crossings:").collect();
    let crossings: usize = parts
        .get(1)
        .and_then(|s| s.trim().parse().ok())
        .expect("Could not parse crossing count");
    assert_eq!(crossings, 40);

    let violations_line = stderr
        .lines()
        .find(|line| line.contains("Violations:"))
        .expect("Could not find 'Violations' line");
    assert!(violations_line.trim_end().ends_with("Violations: 0"));
}

#[test]
fn test_binary_rejects_zero_vehicles() {
    let output = run_binary(&["--vehicles", "0"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("At least one vehicle is required"), "stderr: {}", stderr);
}
