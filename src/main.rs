use clap::Parser;
use log::error;

use intersection_synch::simulation::{
    self, SimConfig, DEFAULT_CROSSING_MS, DEFAULT_ITERATIONS, DEFAULT_MAX_ARRIVAL_MS,
    DEFAULT_VEHICLES,
};
use intersection_synch::synch::WakePolicy;

#[derive(Parser)]
#[command(name = "intersection_synch")]
#[command(about = "Run vehicle threads through a synchronized four-way intersection")]
struct Cli {
    /// Number of concurrently running vehicle threads
    #[arg(long, default_value_t = DEFAULT_VEHICLES)]
    vehicles: usize,

    /// Number of crossings each vehicle makes
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,

    /// Upper bound on the random pause before each arrival, in milliseconds
    #[arg(long, default_value_t = DEFAULT_MAX_ARRIVAL_MS)]
    arrival_ms: u64,

    /// Time each vehicle spends inside the intersection, in milliseconds
    #[arg(long, default_value_t = DEFAULT_CROSSING_MS)]
    crossing_ms: u64,

    /// Seed for reproducible path choices
    #[arg(long)]
    seed: Option<u64>,

    /// Which waiters to wake when a path empties
    #[arg(long, value_enum, default_value_t = WakePolicy::BroadcastAll)]
    wake_policy: WakePolicy,
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,intersection_synch=info"),
    )
    .init();

    let cli = Cli::parse();
    let config = SimConfig {
        vehicles: cli.vehicles,
        iterations: cli.iterations,
        max_arrival_ms: cli.arrival_ms,
        crossing_ms: cli.crossing_ms,
        seed: cli.seed,
        wake_policy: cli.wake_policy,
    };

    match simulation::run_simulation(&config) {
        Ok(report) => {
            report.log_summary();
            if !report.is_safe() {
                error!(
                    "{} pair(s) of crossing vehicles were inside together",
                    report.violations.len()
                );
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("Simulation failed: {:#}", e);
            std::process::exit(1);
        }
    }
}
