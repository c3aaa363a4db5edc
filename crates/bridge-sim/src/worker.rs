//! One car or pedestrian
//!
//! A worker enters once, crosses for a policy-chosen time and leaves
//! once. The leave is tied to a `CrossingPermit`, so a panic while on
//! the bridge still frees the slot.

use std::fmt;
use std::thread;

use bridge_core::kprint::{level_enabled, LogLevel};
use bridge_core::{kinfo, BridgeMonitor, Traffic};
use rand::rngs::StdRng;

use crate::delay::DelayPolicy;

/// Identity of a worker within its class, numbered from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerId {
    pub class: Traffic,
    pub id: usize,
}

impl WorkerId {
    pub fn new(class: Traffic, id: usize) -> Self {
        Self { class, id }
    }

    /// OS thread name, e.g. `car-north-3`
    pub fn thread_name(&self) -> String {
        format!("{}-{}", self.class, self.id)
    }
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.class {
            Traffic::Car(dir) => write!(f, "car {} heading {}", self.id, dir),
            Traffic::Pedestrian => write!(f, "pedestrian {}", self.id),
        }
    }
}

// Snapshots take the monitor lock, so skip them when the line is dropped.
fn log_step(who: WorkerId, step: &str, monitor: &BridgeMonitor) {
    if level_enabled(LogLevel::Info) {
        kinfo!("{} {}. {}", who, step, monitor.snapshot());
    }
}

/// Cross the bridge once
pub fn run_worker(
    who: WorkerId,
    monitor: &BridgeMonitor,
    crossing: &dyn DelayPolicy,
    rng: &mut StdRng,
) {
    log_step(who, "wants to enter", monitor);
    let permit = monitor.cross(who.class);
    log_step(who, "enters the bridge", monitor);

    thread::sleep(crossing.next_delay(rng));

    log_step(who, "leaving the bridge", monitor);
    permit.leave();
    log_step(who, "out of the bridge", monitor);
}
