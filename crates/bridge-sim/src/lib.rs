//! # bridge-sim
//!
//! Drives `bridge-core` with randomized traffic: one generator per class
//! spawns a thread per car or pedestrian at exponentially distributed
//! intervals, and each of those threads crosses exactly once.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bridge_sim::{SimConfig, Simulation};
//!
//! fn main() -> Result<(), bridge_sim::SimError> {
//!     let config = SimConfig::from_env().time_scale(0.01);
//!     let report = Simulation::from_config(&config)?.run()?;
//!     report.print();
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - `config` - `SimConfig`, defaults and `BRIDGE_*` overrides
//! - `delay` - Injectable arrival/crossing timing
//! - `worker` - Single crossing lifecycle
//! - `generator` - Per-class spawning and joining
//! - `simulation` - Runs all generators against one monitor

pub mod config;
pub mod delay;
pub mod worker;
pub mod generator;
pub mod simulation;

pub use config::SimConfig;
pub use delay::{DelayPolicy, Exponential, Fixed, Uniform};
pub use worker::{run_worker, WorkerId};
pub use generator::{Generator, GeneratorReport};
pub use simulation::{SimReport, Simulation};

// Re-export core types
pub use bridge_core::{
    BridgeMonitor, BridgeSnapshot, ConfigError, CrossingPermit, CrossingStats, Direction,
    SimError, SimResult, Traffic, WorkerError,
};

// Re-export kprint macros and controls
pub use bridge_core::{kdebug, kerror, kinfo, kprintln, ktrace, kwarn};
pub use bridge_core::kprint::{init as init_logging, level_enabled, set_log_level, LogLevel};
