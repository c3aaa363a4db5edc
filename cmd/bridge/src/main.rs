//! Single-lane bridge simulation
//!
//! North cars, south cars and pedestrians arrive at random and cross
//! through the monitor; the run ends when every one of them is across.
//!
//! # Environment Variables
//!
//! - `BRIDGE_LOG_LEVEL=debug` - Set log level (off, error, warn, info, debug, trace)
//! - `BRIDGE_LOG_TIME=1` - Timestamp each log line
//! - `BRIDGE_TIME_SCALE=0.01` - Run 100x faster than real time
//! - `BRIDGE_SEED=7` - Reproducible timing
//! - see `SimConfig::from_env` for counts and rates

use bridge_sim::{init_logging, kerror, kinfo, level_enabled, LogLevel, SimConfig, Simulation};
use std::process::ExitCode;

// BRIDGE_TIME_SCALE=0.01 BRIDGE_LOG_TIME=1 cargo run -p bridge-run
fn main() -> ExitCode {
    println!("=== Single-Lane Bridge ===\n");
    init_logging();

    let config = SimConfig::from_env();
    if level_enabled(LogLevel::Debug) {
        config.print();
    }
    if let Err(e) = config.validate() {
        kerror!("{}", e);
        return ExitCode::from(2);
    }

    kinfo!(
        "sending {} north cars, {} south cars, {} pedestrians",
        config.north_cars,
        config.south_cars,
        config.pedestrians
    );

    let report = match Simulation::from_config(&config).and_then(|sim| sim.run()) {
        Ok(report) => report,
        Err(e) => {
            kerror!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!();
    report.print();
    println!("\n=== Simulation Complete ===");

    if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
