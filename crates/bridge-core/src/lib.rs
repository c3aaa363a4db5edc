//! # bridge-core
//!
//! Monitor for a single-lane bridge shared by northbound cars,
//! southbound cars and pedestrians.
//!
//! Cars heading the same way may cross together. Oncoming cars never
//! share the bridge, and pedestrians never share it with any car.
//! Everything that spawns traffic lives in `bridge-sim`; this crate only
//! arbitrates.
//!
//! ## Modules
//!
//! - `state` - Counters, entry predicates and the wakeup priority cycle
//! - `monitor` - `BridgeMonitor` and the scoped `CrossingPermit`
//! - `error` - Error types for the code driving the monitor
//! - `kprint` - Kernel-style stderr logging macros
//! - `env` - Environment variable utilities

pub mod state;
pub mod monitor;
pub mod error;
pub mod kprint;
pub mod env;

pub use state::{BridgeSnapshot, BridgeState, CrossingStats, Direction, Traffic};
pub use monitor::{BridgeMonitor, CrossingPermit};
pub use error::{ConfigError, SimError, SimResult, WorkerError};
pub use env::{env_get, env_get_bool, env_get_millis, env_get_opt};
