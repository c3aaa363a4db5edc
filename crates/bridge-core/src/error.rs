//! Error types for running bridge traffic
//!
//! The monitor itself cannot fail. These cover everything around it:
//! configuration, spawning workers and joining them.

use core::fmt;
use std::io;

use crate::state::{BridgeSnapshot, Traffic};

/// Result type for simulation operations
pub type SimResult<T> = Result<T, SimError>;

/// Errors that can occur while driving traffic over the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Configuration rejected before anything was spawned
    Config(ConfigError),

    /// A car or pedestrian thread failed
    Worker(WorkerError),

    /// A generator thread panicked outside any worker
    GeneratorPanicked(Traffic),

    /// Counters were not all zero after every worker finished
    Unclean(BridgeSnapshot),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Config(e) => write!(f, "config error: {}", e),
            SimError::Worker(e) => write!(f, "worker error: {}", e),
            SimError::GeneratorPanicked(class) => write!(f, "{} generator panicked", class),
            SimError::Unclean(snap) => write!(f, "bridge not empty after run: {}", snap),
        }
    }
}

impl std::error::Error for SimError {}

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Config(e)
    }
}

/// Worker thread errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// The OS refused to create the thread
    SpawnFailed {
        class: Traffic,
        id: usize,
        kind: io::ErrorKind,
    },

    /// The worker panicked; its permit was released while unwinding
    Panicked { class: Traffic, id: usize },
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerError::SpawnFailed { class, id, kind } => {
                write!(f, "failed to spawn {} {}: {}", class, id, kind)
            }
            WorkerError::Panicked { class, id } => write!(f, "{} {} panicked", class, id),
        }
    }
}

impl std::error::Error for WorkerError {}

impl From<WorkerError> for SimError {
    fn from(e: WorkerError) -> Self {
        SimError::Worker(e)
    }
}
